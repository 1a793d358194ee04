//! Platform descriptor.
//!
//! Everything that differs between operating systems is resolved once, at
//! startup, into a [`Platform`] value.  Event handlers consult the
//! descriptor instead of branching on the OS themselves.

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl Os {
    /// The OS this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Os::Linux
        } else if cfg!(target_os = "macos") {
            Os::MacOs
        } else if cfg!(target_os = "windows") {
            Os::Windows
        } else {
            Os::Other
        }
    }
}

/// Pointer button numbers as reported by the toolkit.
pub const BUTTON_PRIMARY: u32 = 1;
pub const BUTTON_SECONDARY: u32 = 3;

/// Which pointer gesture opens the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMenuTrigger {
    /// Secondary (right) button only.
    SecondaryButton,
    /// Secondary button, or primary button with Control held.
    SecondaryOrControlClick,
}

impl ContextMenuTrigger {
    /// Whether a press of `button` with Control held (`control`) should
    /// open the menu.
    pub fn matches(&self, button: u32, control: bool) -> bool {
        match self {
            ContextMenuTrigger::SecondaryButton => button == BUTTON_SECONDARY,
            ContextMenuTrigger::SecondaryOrControlClick => {
                button == BUTTON_SECONDARY || (button == BUTTON_PRIMARY && control)
            }
        }
    }
}

/// Resolved per-OS behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub context_menu: ContextMenuTrigger,
    /// Whether the window is shown without title bar by default.
    pub borderless: bool,
    /// Whether to try the wlr layer-shell protocol before falling back to
    /// an ordinary toplevel.  Only Linux builds link the layer-shell crate.
    pub layer_shell: bool,
}

impl Platform {
    pub fn for_os(os: Os) -> Self {
        Self {
            os,
            context_menu: match os {
                Os::MacOs => ContextMenuTrigger::SecondaryOrControlClick,
                _ => ContextMenuTrigger::SecondaryButton,
            },
            borderless: os == Os::Windows,
            layer_shell: os == Os::Linux,
        }
    }

    /// Descriptor for the running OS, with an optional border override
    /// from the configuration.
    pub fn detect(borderless: Option<bool>) -> Self {
        let mut platform = Self::for_os(Os::current());
        if let Some(b) = borderless {
            platform.borderless = b;
        }
        platform
    }

    /// Whether a pointer press starts a window drag rather than opening
    /// the menu.
    pub fn starts_drag(&self, button: u32, control: bool) -> bool {
        button == BUTTON_PRIMARY && !self.context_menu.matches(button, control)
    }
}
