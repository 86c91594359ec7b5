//! HTTP request handlers - thin layer that delegates to domain service

use super::dto::*;
use super::error::map_domain_error;
use crate::contract::Room;
use crate::domain::Service;
use axum::{
    extract::Path,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Extension, Json,
};
use brainforge_kit::{Problem, SecurityCtx};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::{debug, warn};
use uuid::Uuid;

/// Closes the user's stream slot when the client disconnects
struct LeaveOnDrop {
    service: Arc<Service>,
    room: Room,
    user_id: Uuid,
}

impl Drop for LeaveOnDrop {
    fn drop(&mut self) {
        debug!(room = %self.room, user_id = %self.user_id, "SSE client disconnected");
        self.service.close_stream(self.room, self.user_id);
    }
}

/// GET /realtime/rooms/{room}/events - SSE stream of one room
///
/// Opening the stream joins the room; closing the user's last stream
/// leaves. The stream ends when the hub is closed for shutdown.
pub async fn room_events(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(room): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, Problem> {
    // Subscribe before joining so the stream starts with our own join
    let rx = service.subscribe();
    let room = service.open_stream(&ctx, &room).await.map_err(map_domain_error)?;
    debug!(room = %room, user_id = %ctx.user_id, "SSE client connected");

    let guard = LeaveOnDrop {
        service: service.clone(),
        room,
        user_id: ctx.user_id,
    };

    let stream = BroadcastStream::new(rx).filter_map(move |result| {
        let _presence = &guard;
        async move {
            match result {
                Ok(message) if message.room == room => {
                    let name = message.event.clone();
                    match Event::default().event(&name).json_data(RoomEventDto::from(message)) {
                        Ok(event) => Some(Ok(event)),
                        Err(e) => {
                            warn!("Failed to serialize room event {}: {}", name, e);
                            None
                        }
                    }
                }
                Ok(_) => None,
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(room = %room, skipped, "SSE client lagged behind");
                    None
                }
            }
        }
    })
    .take_until(service.closed());

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(service.config().keep_alive)
            .text("keep-alive"),
    ))
}

pub async fn join_room(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(room): Path<String>,
) -> Result<Json<RoomPresenceDto>, Problem> {
    let (room, members) = service.join(&ctx, &room).await.map_err(map_domain_error)?;
    Ok(Json(RoomPresenceDto {
        room: room.to_string(),
        members: members.into_iter().map(PresenceDto::from).collect(),
    }))
}

pub async fn heartbeat(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(room): Path<String>,
) -> Result<Json<PresenceDto>, Problem> {
    let entry = service.heartbeat(&ctx, &room).await.map_err(map_domain_error)?;
    Ok(Json(entry.into()))
}

pub async fn leave_room(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(room): Path<String>,
) -> Result<StatusCode, Problem> {
    service.leave(&ctx, &room).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn room_presence(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(room_name): Path<String>,
) -> Result<Json<RoomPresenceDto>, Problem> {
    let members = service.members(&ctx, &room_name).await.map_err(map_domain_error)?;
    Ok(Json(RoomPresenceDto {
        room: room_name,
        members: members.into_iter().map(PresenceDto::from).collect(),
    }))
}
