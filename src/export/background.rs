//! Running exports off the calling thread.
//!
//! Exports are file-I/O bound, so interactive callers hand them to the rayon
//! pool and get the outcome back either through a callback or through an
//! [`ExportTask`] handle. There is no cancellation; an export runs to
//! completion or fails fast.
//!
//! Callers must not run two exports into the same destination at once.

use std::sync::mpsc;

use super::{ExportReport, ExportRequest, export};
use crate::error::ExportError;

/// Runs an export on the rayon pool and passes the outcome to `on_complete`.
///
/// The callback runs on the worker thread.
pub fn export_in_background<F>(request: ExportRequest, on_complete: F)
where
    F: FnOnce(Result<ExportReport, ExportError>) + Send + 'static,
{
    log::debug!("queueing background export of '{}'", request.icon_name);
    rayon::spawn(move || {
        let result = export(&request);
        if let Err(ref e) = result {
            log::debug!("background export failed: {e}");
        }
        on_complete(result);
    });
}

/// Handle to an export running on the rayon pool.
#[derive(Debug)]
pub struct ExportTask {
    receiver: mpsc::Receiver<Result<ExportReport, ExportError>>,
}

impl ExportTask {
    /// Starts an export in the background.
    pub fn spawn(request: ExportRequest) -> Self {
        let (sender, receiver) = mpsc::channel();
        export_in_background(request, move |result| {
            // The handle may have been dropped; nobody is left to tell.
            let _ = sender.send(result);
        });
        Self { receiver }
    }

    /// Returns the outcome if the export has finished, without blocking.
    pub fn try_result(&self) -> Option<Result<ExportReport, ExportError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(ExportError::Interrupted)),
        }
    }

    /// Blocks until the export finishes.
    pub fn wait(self) -> Result<ExportReport, ExportError> {
        self.receiver.recv().unwrap_or(Err(ExportError::Interrupted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportSources;
    use crate::generator::{IconScale, TrackIconSize};
    use crate::raster::RasterBuffer;

    #[test]
    fn task_reports_validation_failure() {
        let request = ExportRequest::new("x", "/tmp", ExportSources::automatic(None));
        let result = ExportTask::spawn(request).wait();
        assert!(matches!(result, Err(ExportError::NoSourceImage)));
    }

    #[test]
    fn try_result_polls_until_finished() {
        let request = ExportRequest::new("x", "/tmp", ExportSources::automatic(None));
        let task = ExportTask::spawn(request);

        let result = loop {
            if let Some(result) = task.try_result() {
                break result;
            }
            std::thread::yield_now();
        };
        assert!(matches!(result, Err(ExportError::NoSourceImage)));
    }

    #[test]
    fn dropped_worker_reports_interrupted() {
        let (sender, receiver) = mpsc::channel();
        drop(sender);
        let task = ExportTask { receiver };

        assert!(matches!(task.try_result(), Some(Err(ExportError::Interrupted))));
        assert!(matches!(task.wait(), Err(ExportError::Interrupted)));
    }

    #[test]
    fn callback_receives_report() {
        let dir = tempfile::tempdir().unwrap();
        let source = RasterBuffer::filled(20, 20, [50, 60, 70, 255]).unwrap();
        let request = ExportRequest::new("bg", dir.path(), ExportSources::automatic(Some(source)))
            .with_scales([IconScale::Scale100])
            .with_sizes([TrackIconSize::Size64]);

        let (sender, receiver) = mpsc::channel();
        export_in_background(request, move |result| {
            sender.send(result).unwrap();
        });

        let report = receiver.recv().unwrap().unwrap();
        assert_eq!(report.written.len(), 2);
        assert!(dir.path().join("toolbar_icons/bg.png").is_file());
        assert!(dir.path().join("track_icons/bg.png").is_file());
    }
}
