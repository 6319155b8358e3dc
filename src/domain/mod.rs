// Domain layer: listing types, the reference table, and the pure services that
// classify listings. Adapters and the pipeline live under core/ and config/.

pub mod filters;
pub mod model;
pub mod ports;
pub mod reference;
pub mod services;
pub mod snapshot;

pub use filters::FilterConfig;
pub use reference::ReferenceTable;
