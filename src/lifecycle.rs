/// Identifies one mount of the map component. Continuations of the async
/// SDK load carry it so they can tell whether their mount is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountToken(u64);

/// Owns the live view of a component instance. `install` and `unmount`
/// are the only ways the view field changes.
#[derive(Debug)]
pub struct ViewLifecycle<V> {
    generation: u64,
    mounted: bool,
    view: Option<V>,
}

impl<V> Default for ViewLifecycle<V> {
    fn default() -> Self {
        Self {
            generation: 0,
            mounted: false,
            view: None,
        }
    }
}

impl<V> ViewLifecycle<V> {
    pub fn mount(&mut self) -> MountToken {
        self.generation += 1;
        self.mounted = true;
        MountToken(self.generation)
    }

    pub fn is_live(&self, token: MountToken) -> bool {
        self.mounted && token.0 == self.generation
    }

    /// Takes ownership of `view` for the mount `token` belongs to. A stale
    /// token, or a mount that already owns a view, gets the view back.
    pub fn install(&mut self, token: MountToken, view: V) -> Result<&V, V> {
        if !self.is_live(token) || self.view.is_some() {
            return Err(view);
        }
        Ok(self.view.insert(view))
    }

    #[cfg(test)]
    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    /// Ends the current mount and yields its view, if one was installed.
    /// Later calls yield `None`.
    pub fn unmount(&mut self) -> Option<V> {
        if self.mounted {
            self.generation += 1;
            self.mounted = false;
        }
        self.view.take()
    }
}
