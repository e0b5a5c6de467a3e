// scanlog core library
//
// Loads captured HTTP exchanges from a zip archive and provides the filter
// language and command shell used by the `scanlog` binary.

pub mod archive;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod filter;
pub mod input;
pub mod params;
pub mod paths;
pub mod record;
pub mod session;
pub mod shell;

pub use archive::{load_archive, read_archive, EntryFailure, LoadReport};
pub use config::{Config, DisplaySection, LoaderSection, ShellSection};
pub use error::{
    CommandError, ConfigError, EntryParseError, FilterError, LoadError, ResolutionError, ShellError,
};
pub use filter::{FilterClause, FilterKey, FilterSet, FilterValue};
pub use params::{extract_parameters, ParamLocation, RequestParameter};
pub use record::{Header, InferredScalar, LogRecord};
pub use session::Session;
pub use shell::{Command, LineSource, ScriptSource, Shell, ShellState};
