/// Events a driver session reports while it runs.
#[derive(Debug, Clone)]
pub enum Progress {
    Connected {
        endpoint: String,
    },
    FrameComputed {
        /// 1-based index of the frame within the session.
        frame: u64,
        /// Potential energy in hartree, as it will be sent to the peer.
        energy: f64,
    },
    ForcesSent {
        frame: u64,
    },
    /// Free-form notice, such as an ignored INIT payload.
    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_is_silent() {
        ProgressReporter::new().report(Progress::Message("ignored".into()));
    }

    #[test]
    fn callback_receives_events_in_order() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|p| {
            seen.lock().unwrap().push(format!("{:?}", p));
        }));
        reporter.report(Progress::FrameComputed {
            frame: 1,
            energy: -2.0,
        });
        reporter.report(Progress::ForcesSent { frame: 1 });
        drop(reporter);

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].starts_with("FrameComputed"));
        assert!(seen[1].starts_with("ForcesSent"));
    }
}
