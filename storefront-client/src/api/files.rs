//! Image upload endpoints

use crate::envelope::Envelope;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::request::{FilePart, RequestDescriptor};

const SINGLE: &str = "/api/v1/files/single";
const MULTIPLE: &str = "/api/v1/files/multiple";

/// Header telling the backend which folder the upload belongs to
pub const FOLDER_HEADER: &str = "folder_type";

pub struct FilesApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> FilesApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Upload one image into `folder` (e.g. `user`, `product`)
    pub async fn upload_single(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        folder: &str,
    ) -> Result<Envelope> {
        let request = RequestDescriptor::post(SINGLE)
            .with_header(FOLDER_HEADER, folder)?
            .with_files(vec![FilePart::new("file", file_name, bytes)]);
        Ok(self.gateway.send(request).await)
    }

    /// Upload several images into `folder`, each under the `files` field
    pub async fn upload_multiple(
        &self,
        files: Vec<(String, Vec<u8>)>,
        folder: &str,
    ) -> Result<Envelope> {
        let parts = files
            .into_iter()
            .map(|(name, bytes)| FilePart::new("files", name, bytes))
            .collect();
        let request = RequestDescriptor::post(MULTIPLE)
            .with_header(FOLDER_HEADER, folder)?
            .with_files(parts);
        Ok(self.gateway.send(request).await)
    }
}
