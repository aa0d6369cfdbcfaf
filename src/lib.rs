// Superstore Sales Dashboard - Core Library
// Exposes all modules for use in the CLI, the web server, and tests

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod layout;
pub mod telemetry;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use aggregate::{DailySales, LabeledSales, SubCategoryPoints};
pub use chart::{Background, Figure, Trace};
pub use config::DashboardConfig;
pub use controller::{
    update_bar, update_line, update_pie, update_scatter, BindingError, ChartUpdate, ControlEvent,
    ControlValue, Dispatcher,
};
pub use dataset::{load_csv, LoadError, Transaction, TransactionTable};
pub use layout::{Control, DashboardLayout, Panel};
pub use telemetry::init_tracing;

#[cfg(feature = "server")]
pub use server::{build_router, AppState, InitialChart};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
