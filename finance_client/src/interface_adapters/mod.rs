// Interface adapters: HTTP plumbing, decoding, storage and view/navigation backends.

pub mod api;
pub mod clients;
pub mod decoder;
pub mod navigator;
pub mod state;
pub mod storage;
pub mod view;
