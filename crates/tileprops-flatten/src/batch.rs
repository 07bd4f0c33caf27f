//! Batch flattening
//!
//! Each document is flattened independently, so large batches are mapped
//! over rayon's global pool. Output order always matches input order.

use rayon::prelude::*;
use tileprops_document::DocumentRecord;
use tracing::debug;

use crate::flattener::PropertyFlattener;
use crate::properties::FlatProperties;

impl PropertyFlattener {
    /// Flatten every document in `documents`
    #[must_use]
    pub fn flatten_all<'a>(&self, documents: &'a [DocumentRecord]) -> Vec<FlatProperties<'a>> {
        let parallel = documents.len() >= self.parallel_threshold.max(1);
        debug!(
            documents = documents.len(),
            parallel,
            geometry_field = %self.geometry,
            "flattening batch"
        );

        if parallel {
            documents.par_iter().map(|doc| self.flatten(doc)).collect()
        } else {
            documents.iter().map(|doc| self.flatten(doc)).collect()
        }
    }
}
