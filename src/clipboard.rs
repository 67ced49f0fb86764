//! Copy the structured output to the system clipboard

use crate::error::DebugError;
use crate::parser::Section;
use crate::view::ViewModel;
use anyhow::{Context, Result};

pub trait ClipboardBackend {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Serialize all five fields with their keys into the copy block.
pub fn format_output(view: &ViewModel) -> String {
    Section::all()
        .iter()
        .map(|s| format!("{}:\n{}", s.key(), view.field(*s)))
        .collect::<Vec<String>>()
        .join("\n\n")
        .trim()
        .to_string()
}

/// The copy action. Refuses when nothing but placeholders is shown.
pub fn copy_output(
    backend: &mut dyn ClipboardBackend,
    view: &mut ViewModel,
) -> Result<(), DebugError> {
    if view.all_fields_placeholder() {
        return Err(DebugError::NothingToCopy);
    }

    let text = format_output(view);
    backend.write_text(&text).map_err(|e| {
        tracing::warn!("clipboard write failed: {:#}", e);
        DebugError::ClipboardUnavailable(format!("{:#}", e))
    })?;

    view.mark_copied();
    Ok(())
}

/// System clipboard through `arboard`.
/// The handle is opened on first use and kept, since on X11 the copied
/// text is only served while it is alive.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
}

impl ClipboardBackend for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let handle = match self.handle.as_mut() {
            Some(handle) => handle,
            None => {
                let opened =
                    arboard::Clipboard::new().context("Failed to open the system clipboard")?;
                tracing::info!("system clipboard opened");
                self.handle.insert(opened)
            }
        };
        handle
            .set_text(text.to_string())
            .context("Failed to write to the system clipboard")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeMode;

    #[derive(Default)]
    struct MemoryClipboard {
        fail: bool,
        contents: Option<String>,
    }

    impl ClipboardBackend for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("no display");
            }
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_format_output_block() {
        let mut vm = ViewModel::new(ThemeMode::Dark);
        vm.show_full_output("ERROR_REASON: r\nPROBLEM_LINE: p\nEXPLANATION: e\nFIXED_CODE:\nf\nEXAMPLE:\nx");
        assert_eq!(
            format_output(&vm),
            "ERROR_REASON:\nr\n\nPROBLEM_LINE:\np\n\nEXPLANATION:\ne\n\nFIXED_CODE:\n\nf\n\nEXAMPLE:\n\nx"
        );
    }

    #[test]
    fn test_copy_refused_when_all_placeholders() {
        let mut vm = ViewModel::new(ThemeMode::Dark);
        let mut clip = MemoryClipboard::default();
        let err = copy_output(&mut clip, &mut vm).unwrap_err();
        assert!(matches!(err, DebugError::NothingToCopy));
        assert!(clip.contents.is_none());
        assert_eq!(vm.copy_label(), "Copy");
    }

    #[test]
    fn test_copy_writes_and_flags_feedback() {
        let mut vm = ViewModel::new(ThemeMode::Dark);
        vm.show_full_output("EXPLANATION: only one");
        let mut clip = MemoryClipboard::default();
        copy_output(&mut clip, &mut vm).unwrap();
        let text = clip.contents.unwrap();
        assert!(text.starts_with("ERROR_REASON:\n—"));
        assert!(text.contains("EXPLANATION:\nonly one"));
        assert_eq!(vm.copy_label(), "Copied!");
    }

    #[test]
    fn test_copy_failure_surfaces_notice() {
        let mut vm = ViewModel::new(ThemeMode::Dark);
        vm.show_full_output("EXPLANATION: only one");
        let mut clip = MemoryClipboard {
            fail: true,
            ..Default::default()
        };
        let err = copy_output(&mut clip, &mut vm).unwrap_err();
        assert_eq!(err.notice(), "Copy failed. No clipboard tool available.");
        assert_eq!(vm.copy_label(), "Copy");
    }
}
