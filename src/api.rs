use reqwest::Client;
use serde::Deserialize;

use crate::error::VkdlError;
use crate::resource::ResourceDescriptor;

pub const API_VERSION: &str = "5.199";
pub const API_BASE: &str = "https://api.vk.com/method";

/// What the lookup API tells us about one audio item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioInfo {
    /// URL of the streaming playlist for the single available rendition.
    pub playlist_url: String,
    pub artist: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    error: Option<ApiError>,
    response: Option<Vec<AudioItem>>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    error_msg: String,
}

#[derive(Debug, Deserialize)]
struct AudioItem {
    url: Option<String>,
    artist: Option<String>,
    title: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Resolves a resource descriptor to its playlist URL and tags with a single
/// `audio.getById` round trip. No retries; the first failure is final.
pub async fn get_audio_by_id(
    client: &Client,
    api_base: &str,
    resource: &ResourceDescriptor,
    token: &str,
) -> Result<AudioInfo, VkdlError> {
    let url = format!(
        "{api_base}/audio.getById?audios={}&access_token={token}&v={API_VERSION}",
        resource.api_query()
    );

    let body = client.get(&url).send().await?.text().await?;
    if body.trim().is_empty() {
        return Err(VkdlError::EmptyResponse);
    }
    let envelope: Envelope = serde_json::from_str(&body).map_err(|_| VkdlError::EmptyResponse)?;

    if let Some(error) = envelope.error {
        return Err(VkdlError::RemoteApiError {
            message: error.error_msg,
        });
    }

    let item = envelope
        .response
        .and_then(|mut items| {
            if items.is_empty() {
                None
            } else {
                Some(items.remove(0))
            }
        })
        .ok_or(VkdlError::MissingPlaylistUrl)?;

    let playlist_url = non_blank(item.url).ok_or(VkdlError::MissingPlaylistUrl)?;

    Ok(AudioInfo {
        playlist_url,
        artist: non_blank(item.artist),
        title: non_blank(item.title),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn resource() -> ResourceDescriptor {
        ResourceDescriptor::parse("audio-123_456").unwrap()
    }

    #[tokio::test]
    async fn test_resolves_url_and_tags() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/audio.getById")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("audios".into(), "-123_456_".into()),
                Matcher::UrlEncoded("access_token".into(), "tok".into()),
                Matcher::UrlEncoded("v".into(), API_VERSION.into()),
            ]))
            .with_body(
                r#"{"response":[{"url":"https://cdn/x/index.m3u8","artist":"Foo","title":"Bar"}]}"#,
            )
            .create_async()
            .await;

        let client = Client::new();
        let info = get_audio_by_id(&client, &server.url(), &resource(), "tok")
            .await
            .unwrap();
        assert_eq!(info.playlist_url, "https://cdn/x/index.m3u8");
        assert_eq!(info.artist.as_deref(), Some("Foo"));
        assert_eq!(info.title.as_deref(), Some("Bar"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_blank_tags_become_none() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/audio.getById")
            .match_query(Matcher::Any)
            .with_body(r#"{"response":[{"url":"https://cdn/x.m3u8","artist":"  ","title":null}]}"#)
            .create_async()
            .await;

        let client = Client::new();
        let info = get_audio_by_id(&client, &server.url(), &resource(), "tok")
            .await
            .unwrap();
        assert_eq!(info.artist, None);
        assert_eq!(info.title, None);
    }

    #[tokio::test]
    async fn test_api_error_message_passes_through_verbatim() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/audio.getById")
            .match_query(Matcher::Any)
            .with_body(r#"{"error":{"error_code":5,"error_msg":"invalid token"}}"#)
            .create_async()
            .await;

        let client = Client::new();
        let err = get_audio_by_id(&client, &server.url(), &resource(), "bad")
            .await
            .unwrap_err();
        assert!(matches!(err, VkdlError::RemoteApiError { .. }));
        assert_eq!(err.to_string(), "invalid token");
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_response() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/audio.getById")
            .match_query(Matcher::Any)
            .with_body("")
            .create_async()
            .await;

        let client = Client::new();
        let err = get_audio_by_id(&client, &server.url(), &resource(), "tok")
            .await
            .unwrap_err();
        assert!(matches!(err, VkdlError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_unreadable_body_is_empty_response() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/audio.getById")
            .match_query(Matcher::Any)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = Client::new();
        let err = get_audio_by_id(&client, &server.url(), &resource(), "tok")
            .await
            .unwrap_err();
        assert!(matches!(err, VkdlError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_missing_url_is_protocol_violation() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/audio.getById")
            .match_query(Matcher::Any)
            .with_body(r#"{"response":[{"artist":"Foo","title":"Bar"}]}"#)
            .create_async()
            .await;

        let client = Client::new();
        let err = get_audio_by_id(&client, &server.url(), &resource(), "tok")
            .await
            .unwrap_err();
        assert!(matches!(err, VkdlError::MissingPlaylistUrl));
    }

    #[tokio::test]
    async fn test_empty_response_array_is_protocol_violation() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/audio.getById")
            .match_query(Matcher::Any)
            .with_body(r#"{"response":[]}"#)
            .create_async()
            .await;

        let client = Client::new();
        let err = get_audio_by_id(&client, &server.url(), &resource(), "tok")
            .await
            .unwrap_err();
        assert!(matches!(err, VkdlError::MissingPlaylistUrl));
    }
}
