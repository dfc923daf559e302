// Local ONNX embedding model: download helper and token embedder for BERTScore.

pub mod download;
pub mod onnx;
