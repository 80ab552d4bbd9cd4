//! Wire frames exchanged with the remote peer.
//!
//! Frames are JSON objects. Outbound requests carry an `id`, a `method` and
//! `params`; inbound frames are either a response (`id` plus `result` or
//! `error`) or an event (`method` plus `params`, no `id`).

use bytes::Bytes;
use remote_devtools_core::{Error, Event, MethodType, RawMessage, RemoteError, outcome::Outcome};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Identifier correlating a request with its response.
pub type MessageId = i64;

const EMPTY_PARAMS: &str = "{}";

/// Outbound command frame.
#[derive(Debug, Serialize)]
pub struct Request<'a> {
    /// Correlation id.
    pub id: MessageId,
    /// Method name.
    pub method: &'a MethodType,
    /// Encoded parameters, embedded verbatim.
    pub params: &'a RawValue,
}

impl Request<'_> {
    /// Encode a request frame as a JSON string.
    ///
    /// Empty `params` are sent as `{}`.
    ///
    /// # Errors
    /// Returns an error if `params` is not valid JSON.
    pub fn encode(
        id: MessageId,
        method: &MethodType,
        params: &[u8],
    ) -> Result<String, serde_json::Error> {
        let params: &RawValue = if params.is_empty() {
            serde_json::from_str(EMPTY_PARAMS)?
        } else {
            serde_json::from_slice(params)?
        };
        serde_json::to_string(&Request { id, method, params })
    }
}

/// Inbound frame, before classification.
#[derive(Debug, Default, Deserialize)]
pub struct Message {
    /// Correlation id, present on responses.
    #[serde(default)]
    pub id: Option<MessageId>,
    /// Event name, present on events.
    #[serde(default)]
    pub method: Option<MethodType>,
    /// Event parameters.
    #[serde(default)]
    pub params: Option<Box<RawValue>>,
    /// Successful response payload.
    #[serde(default)]
    pub result: Option<Box<RawValue>>,
    /// Failed response payload.
    #[serde(default)]
    pub error: Option<RemoteError>,
}

/// What an inbound frame turned out to be.
#[derive(Debug)]
pub enum Inbound {
    /// The outcome for request `id`.
    Response {
        /// Correlation id.
        id: MessageId,
        /// Decoded outcome.
        outcome: Outcome,
    },
    /// An event notification.
    Event(Event),
}

impl Message {
    /// Parse a frame.
    ///
    /// # Errors
    /// Returns an error if `frame` is not UTF-8 JSON of the expected shape.
    pub fn parse(frame: impl AsRef<[u8]>) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(frame.as_ref())
    }

    /// Classify the frame as a response or an event.
    ///
    /// A frame with an `id` but neither `result` nor `error` becomes an
    /// [`Error::UnknownResult`] outcome for that id. A frame with neither
    /// `id` nor `method` is unusable and yields `None`.
    #[must_use]
    pub fn classify(self) -> Option<Inbound> {
        if let Some(id) = self.id {
            let outcome = match (self.result, self.error) {
                (_, Some(error)) => Err(Error::Remote(error)),
                (Some(result), None) => Ok(raw_bytes(&result)),
                (None, None) => Err(Error::UnknownResult),
            };
            return Some(Inbound::Response { id, outcome });
        }

        let method = self.method?;
        let params = self
            .params
            .map_or_else(|| Bytes::from_static(EMPTY_PARAMS.as_bytes()), |p| raw_bytes(&p));
        Some(Inbound::Event(Event::new(method, params)))
    }
}

fn raw_bytes(raw: &RawValue) -> RawMessage {
    Bytes::copy_from_slice(raw.get().as_bytes())
}
