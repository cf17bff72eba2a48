//! View-layer interface and input event model.
//!
//! The kernel never renders anything. Whenever it creates a node it asks the
//! embedding layer for an opaque [`ViewHandle`]; afterwards it only tells the
//! embedder to attach/detach handles at the exact points nodes are spliced
//! into or out of the sibling chain, and to toggle boolean state flags at the
//! respace/focus/blur trigger points. The one piece of information flowing
//! back in is [`ViewHost::metrics`], consumed exclusively by per-kind
//! `redraw` hooks (bracket/root/binomial scaling), never by the tree or
//! cursor core.

/// Opaque identifier for a rendered node, minted by the embedder.
///
/// The kernel stores one per node and passes it back verbatim; it never
/// inspects the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewHandle(pub u64);

/// Boolean style flags the kernel toggles on handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFlag {
    /// The block currently containing the cursor.
    HasCursor,
    /// A block with no children (placeholder rendering).
    Empty,
    /// Node is inside the active selection.
    Selected,
    /// Operator classified as unary in its current context.
    UnaryOperator,
    /// Operator classified as binary in its current context.
    BinaryOperator,
    /// Super/subscript rendered limit-style (above/below a big operator).
    LimitStyle,
    /// Named function rendered upright (`sin`, `log`, ...).
    NonItalicized,
}

/// Rendered extent of a handle, as reported by the embedder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Rendered width in the embedder's units.
    pub width: f32,
    /// Rendered height in the embedder's units.
    pub height: f32,
    /// Effective font size at the handle.
    pub font_size: f32,
}

impl Metrics {
    /// A neutral 1em-square extent, used by headless hosts.
    pub const UNIT: Metrics = Metrics {
        width: 1.0,
        height: 1.0,
        font_size: 1.0,
    };
}

/// The rendering/event layer the kernel calls out to.
///
/// All methods are invoked synchronously from inside editing operations;
/// implementations must not call back into the document.
pub trait ViewHost {
    /// Obtain a handle for the root block of a document.
    fn create_root(&mut self) -> ViewHandle;

    /// Obtain a handle for a newly created command node. `display` is the
    /// catalog's rendering template for the kind (e.g. `"±"`, `"√"`).
    fn create_command(&mut self, display: &str) -> ViewHandle;

    /// Obtain a handle for argument block `slot` of command `parent`,
    /// nested inside the parent's handle in argument order.
    fn create_block(&mut self, parent: ViewHandle, slot: usize) -> ViewHandle;

    /// Insert `handle` immediately before an already-attached sibling.
    fn attach_before(&mut self, handle: ViewHandle, sibling: ViewHandle);

    /// Append `handle` as the last child of a block handle.
    fn attach_end(&mut self, handle: ViewHandle, parent: ViewHandle);

    /// Remove `handle` from its visual parent.
    fn detach(&mut self, handle: ViewHandle);

    /// Toggle a boolean style flag.
    fn set_flag(&mut self, handle: ViewHandle, flag: NodeFlag, on: bool);

    /// Query the rendered extent of a handle.
    fn metrics(&self, handle: ViewHandle) -> Metrics {
        let _ = handle;
        Metrics::UNIT
    }

    /// Scale a handle's decoration (paren glyphs, radical sign) relative to
    /// its base size. Output channel of the `redraw` hooks.
    fn set_scale(&mut self, handle: ViewHandle, scale: f32) {
        let _ = (handle, scale);
    }
}

/// A no-op host for headless use (parsing, tests, benchmarks).
///
/// Mints sequential handles and discards every notification.
#[derive(Debug, Default)]
pub struct NullView {
    next_handle: u64,
}

impl NullView {
    /// Create a fresh null host.
    pub fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self) -> ViewHandle {
        self.next_handle += 1;
        ViewHandle(self.next_handle)
    }
}

impl ViewHost for NullView {
    fn create_root(&mut self) -> ViewHandle {
        self.mint()
    }

    fn create_command(&mut self, _display: &str) -> ViewHandle {
        self.mint()
    }

    fn create_block(&mut self, _parent: ViewHandle, _slot: usize) -> ViewHandle {
        self.mint()
    }

    fn attach_before(&mut self, _handle: ViewHandle, _sibling: ViewHandle) {}

    fn attach_end(&mut self, _handle: ViewHandle, _parent: ViewHandle) {}

    fn detach(&mut self, _handle: ViewHandle) {}

    fn set_flag(&mut self, _handle: ViewHandle, _flag: NodeFlag, _on: bool) {}
}

/// Non-character keys routed to [`crate::Document::keystroke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Backspace key.
    Backspace,
    /// Forward delete key.
    Delete,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Tab key.
    Tab,
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
}

/// A key press with modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key identifier.
    pub key: Key,
    /// Shift held.
    pub shift: bool,
    /// Control (or platform command) held.
    pub ctrl: bool,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            shift: false,
            ctrl: false,
        }
    }

    /// A shift-modified key press.
    pub fn shifted(key: Key) -> Self {
        Self {
            key,
            shift: true,
            ctrl: false,
        }
    }

    /// A ctrl-modified key press.
    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            shift: false,
            ctrl: true,
        }
    }
}
