//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper frames its collection and handles the empty case, leaving
//! per-item formatting to the item's own `Display` implementation.

use std::fmt;

use crate::{models::ChatMessage, playback::EdgeFrame};

const PROGRESS_BAR_WIDTH: usize = 20;

/// Narration lines, most recent first, rendered as a list whose first entry
/// is emphasized.
pub struct NarrationLines<'a>(pub &'a [String]);

impl fmt::Display for NarrationLines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((latest, older)) = self.0.split_first() else {
            return writeln!(f, "Waiting for the first status line...");
        };
        writeln!(f, "- **{latest}**")?;
        for line in older {
            writeln!(f, "- {line}")?;
        }
        Ok(())
    }
}

/// Playback frames rendered as one progress bar per edge.
pub struct PlaybackFrames(pub Vec<EdgeFrame>);

impl PlaybackFrames {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Number of edges currently animating.
    pub fn running(&self) -> usize {
        self.0.iter().filter(|frame| frame.running).count()
    }
}

impl fmt::Display for PlaybackFrames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No connections to animate.");
        }
        for frame in &self.0 {
            let label = frame.index + 1;
            if !frame.running {
                writeln!(f, "edge {label:>2} |{}| idle", " ".repeat(PROGRESS_BAR_WIDTH))?;
                continue;
            }
            let filled = usize::from(frame.progress) * PROGRESS_BAR_WIDTH / 100;
            writeln!(
                f,
                "edge {label:>2} |{}{}| {:>3}%",
                "=".repeat(filled),
                " ".repeat(PROGRESS_BAR_WIDTH - filled),
                frame.progress
            )?;
        }
        Ok(())
    }
}

/// Chat transcript in conversation order.
pub struct Transcript(pub Vec<ChatMessage>);

impl Transcript {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.0.last()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No messages yet.");
        }
        for (i, message) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{message}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narration_lines_emphasize_latest() {
        let lines = vec!["second".to_string(), "first".to_string()];
        assert_eq!(NarrationLines(&lines).to_string(), "- **second**\n- first\n");
        assert_eq!(
            NarrationLines(&[]).to_string(),
            "Waiting for the first status line...\n"
        );
    }

    #[test]
    fn test_playback_frames_display() {
        let frames = PlaybackFrames(vec![EdgeFrame::at_phase(0, 0.5), EdgeFrame::idle(1)]);
        let output = frames.to_string();

        assert_eq!(frames.running(), 1);
        assert!(output.contains("edge  1 |==========          |  50%"));
        assert!(output.contains("edge  2 |                    | idle"));
        assert_eq!(
            PlaybackFrames(vec![]).to_string(),
            "No connections to animate.\n"
        );
    }

    #[test]
    fn test_transcript_display() {
        let transcript = Transcript(vec![
            ChatMessage::model("Welcome"),
            ChatMessage::user("How do retries work?"),
        ]);
        assert_eq!(
            transcript.to_string(),
            "**Support:** Welcome\n\n**You:** How do retries work?\n"
        );
        assert_eq!(transcript.last().map(|m| m.text.as_str()), Some("How do retries work?"));
        assert_eq!(Transcript(vec![]).to_string(), "No messages yet.\n");
    }
}
