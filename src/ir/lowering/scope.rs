/// Names declared directly in one open block, in declaration order.
#[derive(Debug, Default, Clone)]
pub(crate) struct LocalScope {
    items: Vec<String>,
}

impl LocalScope {
    pub fn insert(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.contains(&name) {
            self.items.push(name);
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        match self.items.iter().position(|item| item == name) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item == name)
    }

    /// The names still owned by this scope, in declaration order.
    pub fn into_items(self) -> Vec<String> {
        self.items
    }
}

/// The stack of currently open blocks, innermost last.
#[derive(Debug, Default)]
pub(crate) struct ScopeStack {
    scopes: Vec<LocalScope>,
}

impl ScopeStack {
    pub fn push(&mut self) {
        self.scopes.push(LocalScope::default());
    }

    pub fn pop(&mut self) -> Option<LocalScope> {
        self.scopes.pop()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declares the name in the innermost scope, returns false if no scope is open.
    pub fn declare(&mut self, name: &str) -> bool {
        match self.scopes.last_mut() {
            Some(scope) => {
                scope.insert(name);
                true
            }
            None => false,
        }
    }

    /// Depth of the innermost scope declaring the name, counting the outermost as 0.
    pub fn declared_depth(&self, name: &str) -> Option<usize> {
        self.scopes.iter().rposition(|scope| scope.contains(name))
    }

    /// Removes the name from the innermost scope that declares it.
    ///
    /// Returns the depth of that scope, counting the outermost as 0.
    pub fn retract(&mut self, name: &str) -> Option<usize> {
        self.scopes
            .iter_mut()
            .enumerate()
            .rev()
            .find_map(|(depth, scope)| scope.remove(name).then_some(depth))
    }
}
