//! Command-line builder for the CatGt SpikeGLX preprocessing tool.
//!
//! This crate turns a small, typed description of a CatGt run (data directory, run
//! name, gate/trigger indices and an ordered set of named options) into the exact
//! argument list CatGt's parser expects. It never launches CatGt itself: callers
//! either print the rendered string (a "dry run") or hand the token list to a
//! process launcher of their choice.
//!
//! The main entry point is [`CommandConfig`], built through [`CommandConfigBuilder`].
//! Option values are modelled by the closed [`OptionValue`] type, and every failure
//! is reported as a [`BuildError`].
//!
//! ```
//! use catgt_commands::CommandConfig;
//!
//! let config = CommandConfig::builder("/data/test", "g0")
//!     .gate(0)
//!     .option("ap", true)
//!     .option("prb_fld", 1)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     config.render_string("CatGt").unwrap(),
//!     "CatGt -dir=/data/test -run=g0 -g=0 -ap -prb-fld=1"
//! );
//! ```

pub mod config;
pub mod error;
pub mod locate;
pub mod naming;
pub mod paths;
mod render;
pub mod settings;
pub mod value;

pub use config::{CommandConfig, CommandConfigBuilder};
pub use error::{BuildError, Result};
pub use render::DEFAULT_EXECUTABLE;
pub use value::{OptionValue, Scalar};
