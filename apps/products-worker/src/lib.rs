//! Products Worker
//!
//! Answers catalog requests arriving on the message bus. Every instance
//! joins the same queue group, so each request is handled by exactly one
//! worker, and every handled request gets exactly one reply.
//!
//! ```text
//! bus ──▶ Subscription (per subject) ──▶ dispatch ──▶ ProductUsecase
//!  ▲                                         │
//!  └──────────── Envelope reply ◀────────────┘
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod monitoring;
pub mod worker;

pub use config::{Config, WorkerConfig};
pub use dispatcher::{dispatch, handle_message};
pub use error::WorkerError;
pub use worker::{ProductsWorker, Subscription};
