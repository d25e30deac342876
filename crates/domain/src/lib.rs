#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod athlete;
mod error;
mod history;
mod injury;
mod metrics;
mod muscle_group;
mod overload;
mod plan;
mod service;
mod settings;
mod training;
mod volume;
mod week;

pub use athlete::*;
pub use error::*;
pub use history::*;
pub use injury::*;
pub use metrics::*;
pub use muscle_group::*;
pub use overload::*;
pub use plan::*;
pub use service::*;
pub use settings::*;
pub use training::*;
pub use volume::*;
pub use week::*;
