//! Host session API client.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

/// Session metadata exposed by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub title: Option<String>,
}

/// One message in a session's chronological history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

/// Typed fragment of a message body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePart {
    #[serde(rename = "type")]
    pub part_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Error from querying the host session API.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("host connection failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed host response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("host error: {message}")]
    Host { message: String },
    #[error("host closed the connection without responding")]
    Closed,
    #[error("unexpected host response")]
    UnexpectedResponse,
}

/// Session-query capability injected into the notifier.
#[allow(async_fn_in_trait)]
pub trait SessionClient {
    async fn get_session(&self, session_id: &str) -> Result<Session, QueryError>;
    async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>, QueryError>;
}

/// Requests sent to the host over its query socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HostRequest {
    GetSession { session_id: String },
    ListMessages { session_id: String },
}

/// Responses from the host query socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HostResponse {
    Session(Session),
    Messages(Vec<Message>),
    Error { message: String },
}

/// Client for the host's newline-delimited JSON query socket. Opens one
/// connection per request and awaits the single response line.
#[derive(Debug, Clone)]
pub struct HostClient {
    socket_path: PathBuf,
}

impl HostClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    async fn request(&self, request: &HostRequest) -> Result<HostResponse, QueryError> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (reader, mut writer) = stream.into_split();

        let json = serde_json::to_string(request)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        let mut reader = BufReader::new(reader);
        let mut line = String::new();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            return Err(QueryError::Closed);
        }

        match serde_json::from_str(line.trim())? {
            HostResponse::Error { message } => Err(QueryError::Host { message }),
            response => Ok(response),
        }
    }
}

impl SessionClient for HostClient {
    async fn get_session(&self, session_id: &str) -> Result<Session, QueryError> {
        let request = HostRequest::GetSession {
            session_id: session_id.to_string(),
        };
        match self.request(&request).await? {
            HostResponse::Session(session) => Ok(session),
            _ => Err(QueryError::UnexpectedResponse),
        }
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>, QueryError> {
        let request = HostRequest::ListMessages {
            session_id: session_id.to_string(),
        };
        match self.request(&request).await? {
            HostResponse::Messages(messages) => Ok(messages),
            _ => Err(QueryError::UnexpectedResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::UnixListener;

    #[test]
    fn test_parse_session_tolerates_extra_fields() {
        let json = r#"{"id":"s1","title":"Refactor","time":{"created":1}}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.title, Some("Refactor".to_string()));
    }

    #[test]
    fn test_parse_session_without_title() {
        let session: Session = serde_json::from_str("{}").unwrap();
        assert_eq!(session.title, None);
    }

    #[test]
    fn test_parse_message_with_parts() {
        let json = r#"{"role":"user","parts":[{"type":"text","text":"fix the bug"},{"type":"file"}]}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.role, "user");
        assert_eq!(message.parts.len(), 2);
        assert_eq!(message.parts[0].text.as_deref(), Some("fix the bug"));
        assert_eq!(message.parts[1].part_type, "file");
        assert!(message.parts[1].text.is_none());
    }

    #[test]
    fn test_request_round_trip() {
        let request = HostRequest::GetSession {
            session_id: "s1".to_string(),
        };
        let json = serde_json::to_string(&request).unwrap();
        let parsed: HostRequest = serde_json::from_str(&json).unwrap();
        match parsed {
            HostRequest::GetSession { session_id } => assert_eq!(session_id, "s1"),
            other => panic!("expected GetSession, got {:?}", other),
        }
    }

    /// Serve a single connection: read one request line, send one response.
    async fn serve_one(listener: UnixListener, response: HostResponse) {
        let (stream, _) = listener.accept().await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        let _: HostRequest = serde_json::from_str(line.trim()).unwrap();

        let json = serde_json::to_string(&response).unwrap();
        writer.write_all(json.as_bytes()).await.unwrap();
        writer.write_all(b"\n").await.unwrap();
    }

    #[tokio::test]
    async fn test_get_session_over_socket() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("host.sock");
        let listener = UnixListener::bind(&socket_path).unwrap();

        let server = tokio::spawn(serve_one(
            listener,
            HostResponse::Session(Session {
                title: Some("Refactor".to_string()),
            }),
        ));

        let client = HostClient::new(&socket_path);
        let session = client.get_session("s1").await.unwrap();
        assert_eq!(session.title, Some("Refactor".to_string()));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_list_messages_over_socket() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("host.sock");
        let listener = UnixListener::bind(&socket_path).unwrap();

        let messages = vec![Message {
            role: "user".to_string(),
            parts: vec![MessagePart {
                part_type: "text".to_string(),
                text: Some("fix the bug".to_string()),
            }],
        }];
        let server = tokio::spawn(serve_one(listener, HostResponse::Messages(messages.clone())));

        let client = HostClient::new(&socket_path);
        assert_eq!(client.list_messages("s1").await.unwrap(), messages);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_host_error_response_becomes_query_error() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("host.sock");
        let listener = UnixListener::bind(&socket_path).unwrap();

        let server = tokio::spawn(serve_one(
            listener,
            HostResponse::Error {
                message: "no such session".to_string(),
            },
        ));

        let client = HostClient::new(&socket_path);
        let err = client.get_session("missing").await.unwrap_err();
        match err {
            QueryError::Host { message } => assert_eq!(message, "no such session"),
            other => panic!("expected Host error, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_socket_is_io_error() {
        let client = HostClient::new("/nonexistent-dir/host.sock");
        let err = client.get_session("s1").await.unwrap_err();
        assert!(matches!(err, QueryError::Io(_)));
    }
}
