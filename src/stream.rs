//! Uniform provider output stream.
//!
//! Every provider hands its response back as a finite stream of chunks.
//! Providers that only get a complete response from upstream (like the
//! Telkom AI endpoint) still go through this contract so consumers never
//! care which providers stream incrementally.

use std::pin::Pin;

use futures::stream::{self, Stream};

use crate::error::ProviderError;

/// One unit of provider output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    /// Response text. Incremental providers emit many of these; complete
    /// responses arrive as a single chunk.
    Text { text: String },
    /// Token accounting, emitted after the text it accounts for.
    Usage {
        input_tokens: u64,
        output_tokens: u64,
    },
}

/// Finite stream of chunks from one `create_message` call. Not restartable;
/// issue a fresh call to regenerate.
pub type ApiStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, ProviderError>> + Send>>;

/// Build an [`ApiStream`] from chunks that are already in hand.
pub fn stream_from_chunks(chunks: Vec<StreamChunk>) -> ApiStream {
    Box::pin(stream::iter(chunks.into_iter().map(Ok::<_, ProviderError>)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn chunks_come_back_in_order() {
        let stream = stream_from_chunks(vec![
            StreamChunk::Text {
                text: "hello".into(),
            },
            StreamChunk::Usage {
                input_tokens: 3,
                output_tokens: 1,
            },
        ]);

        let chunks: Vec<StreamChunk> = stream.try_collect().await.unwrap();
        assert_eq!(
            chunks,
            vec![
                StreamChunk::Text {
                    text: "hello".into()
                },
                StreamChunk::Usage {
                    input_tokens: 3,
                    output_tokens: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn empty_stream_ends_immediately() {
        let chunks: Vec<StreamChunk> = stream_from_chunks(Vec::new()).try_collect().await.unwrap();
        assert!(chunks.is_empty());
    }
}
