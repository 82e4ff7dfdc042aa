pub mod bill_reader;
pub mod etl;
pub mod formatter;
pub mod pipeline;

pub use crate::domain::model::{BillInput, BillItem, BillOutput, PersonAmount};
pub use crate::domain::ports::{ConfigProvider, OutputFormat, Pipeline, Storage};
pub use crate::utils::error::Result;
