use reqwest::Client;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::crypto;
use crate::error::VkdlError;
use crate::manifest::Segment;

/// Downloads every segment in order, decrypting keyed ones, and appends the
/// resulting bytes to `sink` strictly sequentially. The byte order in the
/// sink is load-bearing: the assembled stream is a plain concatenation that
/// downstream decoding depends on.
///
/// After each segment the callback receives `floor(completed * 100 / total)`;
/// for a non-empty list the final call is exactly 100. An empty list writes
/// nothing and reports nothing.
///
/// Any failure aborts the remaining assembly. Bytes already written stay in
/// the sink; discarding them is the caller's decision.
pub async fn assemble_segments<W, F>(
    client: &Client,
    segments: &[Segment],
    sink: &mut W,
    on_progress: &mut F,
) -> Result<(), VkdlError>
where
    W: AsyncWrite + Unpin,
    F: FnMut(u8),
{
    let total = segments.len();

    for (index, segment) in segments.iter().enumerate() {
        let resp = client.get(&segment.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(VkdlError::SegmentFetchError {
                status: status.as_u16(),
            });
        }
        let data = resp.bytes().await?;
        let data = match &segment.key {
            Some(key) => crypto::decrypt_segment(&data, key)?,
            None => data.to_vec(),
        };
        sink.write_all(&data).await?;
        on_progress((((index + 1) * 100) / total) as u8);
    }

    Ok(())
}
