#![warn(missing_docs)]

//! Memoized theme styles with idle-time warming and flash-free stylesheet swapping.

pub use warmstyle_stylesheet as stylesheet;
pub use warmstyle_theme as theme;

/// Contains the [runtime::ThemeRuntime] facade.
pub mod runtime;

/// A "prelude" for users of warmstyle.
///
/// Importing this module brings into scope the types needed to memoize
/// styles and swap theme stylesheets.
///
/// ```rust
/// use warmstyle::prelude::*;
/// ```
pub mod prelude {
    pub use crate::runtime::ThemeRuntime;

    pub use crate::theme::args::StyleArgs;
    pub use crate::theme::config::WarmConfig;
    pub use crate::theme::handle::ThemeHandle;
    pub use crate::theme::registry::{ThemeRegistry, ThemeResolver};
    pub use crate::theme::scheduler::{
        CancelToken, IdleScheduler, LocalTimerScheduler, ManualScheduler, WarmRun,
    };
    pub use crate::theme::service::StyleCacheService;
    pub use crate::theme::style_fn::StyleFn;
    pub use crate::theme::{StyleError, StyleResult};

    pub use crate::stylesheet::host::StylesheetHost;
    pub use crate::stylesheet::mode::{Media, ThemeMode};
    pub use crate::stylesheet::swapper::{StylesheetSwapper, SwapOutcome};
    pub use crate::stylesheet::virtual_document::VirtualDocument;

    #[cfg(feature = "web")]
    pub use crate::stylesheet::web::WebDocument;
    #[cfg(feature = "web")]
    pub use crate::theme::web::BrowserIdleScheduler;
}
