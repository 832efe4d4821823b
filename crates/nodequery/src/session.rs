//! Per-script interpreter state.

use nodequery_core::{NamedValues, OutputFeatures, SyntaxTree, TraversalKind, Value};

/// The mutable state one script runs against.
///
/// A session borrows the tree read-only and owns everything the script can
/// change. Only the interpreter mutates it.
pub struct QuerySession<'t, T: SyntaxTree + ?Sized> {
    tree: &'t T,
    named_values: NamedValues<T::Pattern>,
    bind_root: bool,
    print_matcher: bool,
    traversal: TraversalKind,
    output: OutputFeatures,
    terminate: bool,
}

impl<'t, T: SyntaxTree + ?Sized> QuerySession<'t, T> {
    /// Creates a session with default options over `tree`.
    #[must_use]
    pub fn new(tree: &'t T) -> Self {
        Self {
            tree,
            named_values: NamedValues::new(),
            bind_root: true,
            print_matcher: false,
            traversal: TraversalKind::default(),
            output: OutputFeatures::default(),
            terminate: false,
        }
    }

    /// Returns the tree queries run against.
    #[must_use]
    pub const fn tree(&self) -> &'t T {
        self.tree
    }

    /// Returns every named value.
    #[must_use]
    pub const fn named_values(&self) -> &NamedValues<T::Pattern> {
        &self.named_values
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value<T::Pattern>> {
        self.named_values.get(name)
    }

    /// Returns whether matches bind their root node as `root`.
    #[must_use]
    pub const fn bind_root(&self) -> bool {
        self.bind_root
    }

    /// Returns the `print-matcher` flag. The interpreter records it but never
    /// acts on it.
    #[must_use]
    pub const fn print_matcher(&self) -> bool {
        self.print_matcher
    }

    /// Returns the traversal mode used for matching.
    #[must_use]
    pub const fn traversal(&self) -> TraversalKind {
        self.traversal
    }

    /// Returns the enabled output features.
    #[must_use]
    pub const fn output(&self) -> &OutputFeatures {
        &self.output
    }

    /// Returns whether a `quit` has run.
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        self.terminate
    }

    pub(crate) fn set_value(&mut self, name: String, value: Value<T::Pattern>) {
        self.named_values.insert(name, value);
    }

    pub(crate) fn remove_value(&mut self, name: &str) {
        self.named_values.remove(name);
    }

    pub(crate) const fn set_bind_root(&mut self, enabled: bool) {
        self.bind_root = enabled;
    }

    pub(crate) const fn set_print_matcher(&mut self, enabled: bool) {
        self.print_matcher = enabled;
    }

    pub(crate) const fn set_traversal(&mut self, traversal: TraversalKind) {
        self.traversal = traversal;
    }

    pub(crate) const fn output_mut(&mut self) -> &mut OutputFeatures {
        &mut self.output
    }

    pub(crate) const fn terminate(&mut self) {
        self.terminate = true;
    }
}
