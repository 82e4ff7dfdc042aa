pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};

pub use core::{
    bill_reader::{parse_bill_bytes, parse_bill_str},
    etl::{collect_sources, BatchReport, BillEngine},
    formatter::{render, render_csv, render_json, render_text},
    pipeline::BillPipeline,
};
pub use domain::model::{BillInput, BillItem, BillOutput, ItemShare, Money, PersonAmount};
pub use domain::ports::OutputFormat;
pub use domain::services::{allocate, format_date, resolve_participants, ParticipantResolution};
pub use utils::error::{BillError, ErrorKind, Result};
