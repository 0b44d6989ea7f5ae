use serde_json::Value;

use super::{CommitMode, Context, Settings, WriteMode, DEFAULT_WRITE_SIZE};
use crate::adapter::Adapter;
use crate::error::{MutentError, Result};
use crate::hooks::Hooks;
use crate::intent::Intent;
use crate::tree::Node;

/// One configuration layer: store defaults, a plugin, or per-call
/// overrides.
///
/// Merging a layer on top of another overrides scalar settings and appends
/// hooks and mutators.
pub struct Options<A: Adapter> {
    pub settings: Settings,
    pub hooks: Hooks<A>,
    /// Nodes appended after the mutation's own tree.
    pub mutators: Vec<Node<A::Item>>,
}

/// A reusable layer registered on a store.
pub type Plugin<A> = Options<A>;

impl<A: Adapter> Default for Options<A> {
    fn default() -> Self {
        Options {
            settings: Settings::default(),
            hooks: Hooks::default(),
            mutators: Vec::new(),
        }
    }
}

impl<A: Adapter> Clone for Options<A> {
    fn clone(&self) -> Self {
        Options {
            settings: self.settings.clone(),
            hooks: self.hooks.clone(),
            mutators: self.mutators.clone(),
        }
    }
}

impl<A: Adapter> Options<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit_mode(mut self, commit_mode: CommitMode) -> Self {
        self.settings.commit_mode = Some(commit_mode);
        self
    }

    pub fn write_mode(mut self, write_mode: WriteMode) -> Self {
        self.settings.write_mode = Some(write_mode);
        self
    }

    pub fn write_size(mut self, write_size: usize) -> Self {
        self.settings.write_size = Some(write_size);
        self
    }

    pub fn opaque(mut self, opaque: Value) -> Self {
        self.settings.opaque = Some(opaque);
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = self.settings.merge(settings);
        self
    }

    pub fn hooks(mut self, hooks: Hooks<A>) -> Self {
        self.hooks = self.hooks.concat(hooks);
        self
    }

    pub fn mutator(mut self, node: Node<A::Item>) -> Self {
        self.mutators.push(node);
        self
    }

    pub fn merge(self, other: Options<A>) -> Self {
        let mut mutators = self.mutators;
        mutators.extend(other.mutators);
        Options {
            settings: self.settings.merge(other.settings),
            hooks: self.hooks.concat(other.hooks),
            mutators,
        }
    }

    pub(crate) fn resolve(
        self,
        adapter: &str,
        intent: Intent,
        argument: String,
        multiple: bool,
    ) -> Result<Context<A>> {
        let write_size = self.settings.write_size.unwrap_or(DEFAULT_WRITE_SIZE);
        if write_size == 0 {
            return Err(MutentError::InvalidOptions(
                "write size must be a positive integer".into(),
            ));
        }

        Ok(Context {
            adapter: adapter.to_string(),
            intent,
            argument,
            multiple,
            commit_mode: self.settings.commit_mode.unwrap_or_default(),
            write_mode: self.settings.write_mode.unwrap_or_default(),
            write_size,
            hooks: self.hooks,
            mutators: self.mutators,
            opaque: self.settings.opaque,
        })
    }
}
