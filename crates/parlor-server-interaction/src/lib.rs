// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Interaction handling for Parlor.
//!
//! Each inbound [`Interaction`] carries a [`RenderContext`] that loads the
//! user's identity, settings and locale at most once, no matter how many
//! replies the handler renders. [`Responder`] turns a [`MessageTemplate`]
//! into localized text and hands it to a [`MessageSink`].

pub mod context;
pub mod error;
pub mod interaction;
pub mod loader;
pub mod render;
pub mod responder;
pub mod service;
pub mod sink;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use context::{BundlePatch, RenderBundle, RenderContext, UserIdentity};
pub use error::{InteractionError, Result};
pub use interaction::{ChatId, Interaction, InteractionKind, MessageId, Originator};
pub use loader::ContextLoader;
pub use render::{ButtonTemplate, MessageTemplate, Text};
pub use responder::Responder;
pub use service::ContextService;
pub use sink::{Button, ButtonAction, Keyboard, MessageSink, OutgoingMessage, SinkError};
