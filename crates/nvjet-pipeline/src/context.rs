//! Per-thread decode driver enforcing the ping-pong stage discipline.

use nvjet_core::codec_traits::DecodeSession;
use nvjet_core::error::{EngineError, Result};
use nvjet_core::types::{DeviceImage, Roi, PIPELINE_STAGES};

/// Drives one [`DecodeSession`], rotating the session's stage slots at
/// image granularity.
///
/// Image `i` uses stage `i % P`, so the host parses image `i + 1` into a
/// fresh {pinned buffer, parse handle} slot while the device may still be
/// reading image `i`'s slot asynchronously.  A slot that still carries
/// pending work from submission `i - P` is synchronized before submission
/// `i` overwrites it; consecutive images never share a slot without an
/// intervening synchronization.
pub struct DecoderContext<S: DecodeSession> {
    session: S,
    submit_index: usize,
    pending: Vec<bool>,
}

impl<S: DecodeSession> DecoderContext<S> {
    pub fn new(session: S) -> Result<Self> {
        let stages = session.stages();
        if stages < PIPELINE_STAGES {
            return Err(EngineError::InvariantViolation(format!(
                "session exposes {stages} stage slots, pipeline depth requires {PIPELINE_STAGES}"
            )));
        }
        Ok(Self {
            session,
            submit_index: 0,
            pending: vec![false; stages],
        })
    }

    /// Parse and asynchronously submit one image, waiting out any work
    /// still pending on its stage slot from `PIPELINE_STAGES` submissions
    /// ago.
    pub fn decode_image(
        &mut self,
        data: &[u8],
        output: &DeviceImage,
        roi: Option<Roi>,
    ) -> Result<()> {
        let stage = self.submit_index % self.pending.len();
        if self.pending[stage] {
            self.session.synchronize()?;
            self.pending.iter_mut().for_each(|p| *p = false);
        }
        self.session.parse_header(stage, data)?;
        self.session.submit_decode(stage, output, roi)?;
        self.pending[stage] = true;
        self.submit_index += 1;
        Ok(())
    }

    /// Block until every submitted decode completes.  Must precede any
    /// host read of decoded pixels.
    pub fn synchronize(&mut self) -> Result<()> {
        self.session.synchronize()?;
        self.pending.iter_mut().for_each(|p| *p = false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    enum Event {
        Parse(usize),
        Submit(usize),
        Sync,
    }

    #[derive(Default)]
    struct RecordingSession {
        events: Vec<Event>,
    }

    impl DecodeSession for RecordingSession {
        fn stages(&self) -> usize {
            PIPELINE_STAGES
        }

        fn parse_header(&mut self, stage: usize, _data: &[u8]) -> Result<()> {
            self.events.push(Event::Parse(stage));
            Ok(())
        }

        fn submit_decode(
            &mut self,
            stage: usize,
            _output: &DeviceImage,
            _roi: Option<Roi>,
        ) -> Result<()> {
            self.events.push(Event::Submit(stage));
            Ok(())
        }

        fn synchronize(&mut self) -> Result<()> {
            self.events.push(Event::Sync);
            Ok(())
        }
    }

    fn decode_images(ctx: &mut DecoderContext<RecordingSession>, count: usize) {
        let image = DeviceImage::default();
        for _ in 0..count {
            ctx.decode_image(b"jpeg", &image, None).unwrap();
        }
    }

    #[test]
    fn stages_alternate_per_image() {
        let mut ctx = DecoderContext::new(RecordingSession::default()).unwrap();
        decode_images(&mut ctx, 2);
        assert_eq!(
            ctx.session.events,
            vec![
                Event::Parse(0),
                Event::Submit(0),
                Event::Parse(1),
                Event::Submit(1),
            ]
        );
    }

    #[test]
    fn consecutive_images_never_share_a_slot_without_sync() {
        // Two back-to-back submissions in one batch: the second image's
        // parse must not land in the slot the first image's in-flight
        // transfer may still be reading.
        let mut ctx = DecoderContext::new(RecordingSession::default()).unwrap();
        decode_images(&mut ctx, 2);

        let events = &ctx.session.events;
        assert!(!events.contains(&Event::Sync));
        let first_stage = match events[0] {
            Event::Parse(stage) => stage,
            other => panic!("expected a parse first, got {other:?}"),
        };
        let second_stage = match events[2] {
            Event::Parse(stage) => stage,
            other => panic!("expected a parse third, got {other:?}"),
        };
        assert_ne!(first_stage, second_stage);
    }

    #[test]
    fn pending_slot_reuse_synchronizes_first() {
        let mut ctx = DecoderContext::new(RecordingSession::default()).unwrap();
        decode_images(&mut ctx, 3);

        // Image 2 reuses stage 0; a sync must separate image 0's submit
        // from image 2's parse.
        assert_eq!(
            ctx.session.events,
            vec![
                Event::Parse(0),
                Event::Submit(0),
                Event::Parse(1),
                Event::Submit(1),
                Event::Sync,
                Event::Parse(0),
                Event::Submit(0),
            ]
        );
    }

    #[test]
    fn explicit_sync_clears_pending() {
        let mut ctx = DecoderContext::new(RecordingSession::default()).unwrap();
        decode_images(&mut ctx, 2);
        ctx.synchronize().unwrap();
        // Both slots are clean again: the next rotation does not sync.
        decode_images(&mut ctx, 2);

        let syncs = ctx
            .session
            .events
            .iter()
            .filter(|e| **e == Event::Sync)
            .count();
        assert_eq!(syncs, 1);
    }

    struct ShallowSession;

    impl DecodeSession for ShallowSession {
        fn stages(&self) -> usize {
            1
        }
        fn parse_header(&mut self, _stage: usize, _data: &[u8]) -> Result<()> {
            Ok(())
        }
        fn submit_decode(
            &mut self,
            _stage: usize,
            _output: &DeviceImage,
            _roi: Option<Roi>,
        ) -> Result<()> {
            Ok(())
        }
        fn synchronize(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn rejects_sessions_below_pipeline_depth() {
        assert!(DecoderContext::new(ShallowSession).is_err());
    }
}
