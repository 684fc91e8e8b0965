//! Lazy, cursor-backed iteration over every stored log.
//!
//! `LogScan` owns the range cursor it was opened with and guarantees that
//! cursor is closed exactly once: when the scan runs out, when an entry fails
//! to read or decode, or when the scan is dropped early.

use std::iter::FusedIterator;

use tracing::{debug, warn};

use logbook_codec::decode;
use logbook_contracts::{
    error::{LogbookError, LogbookResult, StateError, StateResult},
    record::LogRecord,
};

use crate::traits::StateIterator;

const OPERATION: &str = "scan_logs";

/// Iterator over all logs in the contract namespace, in ascending key order.
///
/// Yields `Err` at most once; after an error the cursor is already released
/// and the iterator only returns `None`.
pub struct LogScan<'a> {
    cursor: Option<Box<dyn StateIterator + 'a>>,
    /// Key of the last entry read, used to locate cursor failures.
    last_key: String,
    yielded: usize,
}

impl<'a> LogScan<'a> {
    pub(crate) fn new(cursor: Box<dyn StateIterator + 'a>) -> Self {
        Self {
            cursor: Some(cursor),
            last_key: String::new(),
            yielded: 0,
        }
    }

    /// True once the underlying cursor has been closed.
    pub fn is_released(&self) -> bool {
        self.cursor.is_none()
    }

    fn release(&mut self) -> StateResult<()> {
        match self.cursor.take() {
            Some(mut cursor) => {
                debug!(
                    yielded = self.yielded,
                    last_key = %self.last_key,
                    "closing log scan cursor"
                );
                cursor.close()
            }
            None => Ok(()),
        }
    }

    fn store_error(&self, source: StateError) -> LogbookError {
        LogbookError::Store {
            operation: OPERATION,
            key: self.last_key.clone(),
            source,
        }
    }
}

impl Iterator for LogScan<'_> {
    type Item = LogbookResult<LogRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;

        if !cursor.has_next() {
            return match self.release() {
                Ok(()) => None,
                Err(source) => Some(Err(self.store_error(source))),
            };
        }

        let result = match cursor.next_entry() {
            Ok(entry) => {
                self.last_key = entry.key;
                decode(&entry.value).map_err(|source| LogbookError::Codec {
                    operation: OPERATION,
                    key: self.last_key.clone(),
                    source,
                })
            }
            Err(source) => Err(self.store_error(source)),
        };

        match &result {
            Ok(_) => self.yielded += 1,
            Err(err) => {
                warn!(error = %err, "log scan aborted");
                if let Err(close_err) = self.release() {
                    warn!(error = %close_err, "failed to close log scan cursor after error");
                }
            }
        }

        Some(result)
    }
}

impl FusedIterator for LogScan<'_> {}

impl Drop for LogScan<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!(
                error = %err,
                last_key = %self.last_key,
                "failed to close log scan cursor on drop"
            );
        }
    }
}
