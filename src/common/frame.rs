use anyhow::{Result, bail};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// 4-byte big-endian length prefix followed by a JSON body.
pub fn encode_frame<T: Serialize>(message: &T) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(message)?;
    let mut frame = Vec::with_capacity(body.len() + 4);
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

pub async fn write_frame<T, W>(stream: &mut W, message: &T) -> Result<()>
where
    T: Serialize,
    W: AsyncWrite + Unpin,
{
    let frame = encode_frame(message)?;
    stream.write_all(&frame).await?;
    stream.flush().await?;
    Ok(())
}

/// Reads one frame body. `Ok(None)` means the peer closed the connection
/// between frames.
pub async fn read_frame<R>(reader: &mut R, max_frame_len: usize) -> Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let mut length_buf = [0u8; 4];
    if let Err(e) = reader.read_exact(&mut length_buf).await {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            return Ok(None);
        }
        return Err(e.into());
    }

    let total_len = u32::from_be_bytes(length_buf) as usize;
    if total_len > max_frame_len {
        bail!("frame of {} bytes exceeds limit of {} bytes", total_len, max_frame_len);
    }

    let mut buffer = vec![0u8; total_len];
    reader.read_exact(&mut buffer).await?;
    Ok(Some(buffer))
}
