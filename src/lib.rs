//! Core library for the insightly-tags command line application.
//!
//! The library reconciles an enrolment database extract with an Insightly
//! contact-tag export and produces per-student tag reports. Responsibilities are
//! kept narrow: record types live in [`insightly::tags::model`], the pipeline
//! stages in [`insightly::tags::validate`], [`insightly::tags::clean`],
//! [`insightly::tags::extract`], [`insightly::tags::activity`] and
//! [`insightly::tags::reconcile`], the parameterised report in
//! [`insightly::tags::report`], file adapters under [`insightly::tags::io`],
//! and the load/generate/write orchestration in [`insightly::tags::run`].

pub mod insightly;

pub use insightly::tags::{
    Result, ToolError, activity, clean, config, error, extract, io, model, reconcile, report,
    run, validate,
};
