//! Replies to CTCP queries.
//!
//! Every reply is a `NOTICE` back to the querying nick with the body wrapped
//! in CTCP delimiters.

use std::fmt;
use std::sync::Arc;

use chrono::Local;
use ircev_core::{Event, SendResult, ctcp_quote};

use crate::session::Session;

/// Body of the `CLIENTINFO` reply.
pub const CLIENTINFO_REPLY: &str = "CLIENTINFO PING VERSION TIME USERINFO CLIENTINFO";

fn reply(session: &Session, event: &Event, body: fmt::Arguments<'_>) -> SendResult<()> {
    let body = ctcp_quote(&body.to_string());
    session.send_rawf(format_args!("NOTICE {} :{body}", event.nick))
}

pub async fn on_version(session: Arc<Session>, event: Arc<Event>) -> SendResult<()> {
    reply(&session, &event, format_args!("VERSION {}", session.version()))
}

pub async fn on_userinfo(session: Arc<Session>, event: Arc<Event>) -> SendResult<()> {
    reply(&session, &event, format_args!("USERINFO {}", session.user()))
}

pub async fn on_clientinfo(session: Arc<Session>, event: Arc<Event>) -> SendResult<()> {
    reply(&session, &event, format_args!("{CLIENTINFO_REPLY}"))
}

pub async fn on_time(session: Arc<Session>, event: Arc<Event>) -> SendResult<()> {
    let now = Local::now().to_rfc2822();
    reply(&session, &event, format_args!("TIME {now}"))
}

/// Echoes the whole query body, `PING` keyword included.
pub async fn on_ping(session: Arc<Session>, event: Arc<Event>) -> SendResult<()> {
    reply(&session, &event, format_args!("{}", event.message))
}
