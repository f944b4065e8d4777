//! End-to-end editor workflows: edit, evaluate, open, save

use std::fs;
use std::path::PathBuf;

use seqpad::core::{ImageFormat, RenderConfig};
use seqpad::diagram::RenderedImage;
use seqpad::editor::{
    Command, EditorShell, EditorState, EvalState, FileChoice, Frontend, SaveMode, SaveOutcome,
    INVALID_TINT, START_DIAGRAM,
};

fn text_config() -> RenderConfig {
    RenderConfig::new(ImageFormat::Text, false)
}

/// Scripted frontend: canned dialog replies, records what the shell pushes
#[derive(Default)]
struct ScriptedFrontend {
    text: String,
    tint: Option<(u8, u8, u8)>,
    status: String,
    title: String,
    shown: Vec<RenderedImage>,
    open_reply: Option<PathBuf>,
    save_reply: Option<FileChoice>,
}

impl Frontend for ScriptedFrontend {
    fn editor_text(&self) -> String {
        self.text.clone()
    }

    fn set_editor_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_editor_tint(&mut self, tint: Option<(u8, u8, u8)>) {
        self.tint = tint;
    }

    fn show_image(&mut self, image: &RenderedImage) {
        self.shown.push(image.clone());
    }

    fn set_status(&mut self, message: &str) {
        self.status = message.to_string();
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn ask_open_path(&mut self) -> Option<PathBuf> {
        self.open_reply.clone()
    }

    fn ask_save_path(&mut self, _suggested_name: &str) -> Option<FileChoice> {
        self.save_reply.clone()
    }

    fn show_info(&mut self, _title: &str, _body: &str) {}
}

fn shell() -> EditorShell<ScriptedFrontend> {
    let state = EditorState::new(text_config()).unwrap();
    EditorShell::new(state, ScriptedFrontend::default())
}

// A fresh session shows the rendered template and no tint.
#[test]
fn test_startup_renders_template() {
    let shell = shell();
    assert_eq!(shell.frontend().text, START_DIAGRAM);
    assert_eq!(shell.frontend().shown.len(), 1);
    assert!(shell.frontend().shown[0].as_text().unwrap().contains("webserver"));
    assert_eq!(shell.frontend().tint, None);
}

// Editing to valid text and evaluating replaces the image.
#[test]
fn test_edit_evaluate_replaces_image() {
    let mut shell = shell();
    shell.frontend_mut().text = "diagram { cache -> db; }".to_string();
    shell.dispatch(Command::Evaluate).unwrap();

    let last = shell.frontend().shown.last().unwrap();
    assert!(last.as_text().unwrap().contains("cache"));
    assert!(!last.as_text().unwrap().contains("browser"));
}

// Breaking the text keeps the old image and tints the editor; fixing it
// recovers.
#[test]
fn test_invalid_then_fixed() {
    let mut shell = shell();
    shell.frontend_mut().text = "diagram { broken".to_string();
    shell.dispatch(Command::Evaluate).unwrap();
    assert_eq!(shell.frontend().tint, Some(INVALID_TINT));
    assert_eq!(shell.frontend().shown.len(), 1);
    assert!(matches!(
        shell.state().eval_state(),
        EvalState::Invalid { .. }
    ));

    shell.frontend_mut().text = "diagram { broken -> fixed; }".to_string();
    shell.dispatch(Command::Evaluate).unwrap();
    assert_eq!(shell.frontend().tint, None);
    assert_eq!(shell.frontend().shown.len(), 2);
}

// Evaluating the same text twice produces identical images.
#[test]
fn test_evaluate_idempotent() {
    let mut shell = shell();
    shell.dispatch(Command::Evaluate).unwrap();
    shell.dispatch(Command::Evaluate).unwrap();
    let shown = &shell.frontend().shown;
    assert_eq!(shown[shown.len() - 1], shown[shown.len() - 2]);
}

// First save asks for a path; later saves reuse it silently.
#[test]
fn test_first_save_prompts_later_saves_do_not() {
    let dir = tempfile::tempdir().unwrap();
    let mut shell = shell();
    shell.frontend_mut().save_reply = Some(FileChoice {
        directory: dir.path().to_path_buf(),
        file_name: "flow.diag".to_string(),
    });
    shell.dispatch(Command::Save).unwrap();
    assert!(shell.state().record().already_saved);
    assert_eq!(fs::read_to_string(dir.path().join("flow.diag")).unwrap(), START_DIAGRAM);

    shell.frontend_mut().save_reply = None; // dialog would now cancel
    shell.frontend_mut().text = "diagram { a -> b; }".to_string();
    shell.dispatch(Command::Save).unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("flow.diag")).unwrap(),
        "diagram { a -> b; }"
    );
}

// Save-As always prompts, even with a path on record.
#[test]
fn test_save_as_always_prompts() {
    let dir = tempfile::tempdir().unwrap();
    let mut shell = shell();
    shell.frontend_mut().save_reply = Some(FileChoice {
        directory: dir.path().to_path_buf(),
        file_name: "first.diag".to_string(),
    });
    shell.dispatch(Command::Save).unwrap();

    shell.frontend_mut().save_reply = Some(FileChoice {
        directory: dir.path().to_path_buf(),
        file_name: "second.diag".to_string(),
    });
    shell.dispatch(Command::SaveAs).unwrap();
    assert!(dir.path().join("second.diag").exists());
    assert_eq!(shell.frontend().title, "Editing second.diag");
}

// Open then save reproduces the file byte for byte.
#[test]
fn test_open_save_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let source = "diagram {\n  client -> server [label = \"SYN\"];\n  client <-- server;\n}\n";
    let original = dir.path().join("net.diag");
    fs::write(&original, source).unwrap();

    let mut shell = shell();
    shell.frontend_mut().open_reply = Some(original.clone());
    shell.dispatch(Command::Open).unwrap();
    assert_eq!(shell.frontend().text, source);

    let copy_dir = tempfile::tempdir().unwrap();
    shell.frontend_mut().save_reply = Some(FileChoice {
        directory: copy_dir.path().to_path_buf(),
        file_name: "net.diag".to_string(),
    });
    shell.dispatch(Command::Save).unwrap();
    assert_eq!(
        fs::read(copy_dir.path().join("net.diag")).unwrap(),
        fs::read(&original).unwrap()
    );
}

// Opening a file that does not parse still loads the text, with tint.
#[test]
fn test_open_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.diag");
    fs::write(&path, "not a diagram at all").unwrap();

    let mut shell = shell();
    shell.frontend_mut().open_reply = Some(path);
    shell.dispatch(Command::Open).unwrap();
    assert_eq!(shell.frontend().text, "not a diagram at all");
    assert_eq!(shell.frontend().tint, Some(INVALID_TINT));
    // Template image from startup stays on display
    assert_eq!(shell.frontend().shown.len(), 1);
}

// Image mode saves the encoded image rather than the source.
#[test]
fn test_image_save_mode() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = EditorState::new(RenderConfig::default()).unwrap();
    state.set_mode(SaveMode::Image);

    let path = state
        .save_to(dir.path().to_path_buf(), "simple.png".to_string())
        .unwrap();
    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);

    match state.save().unwrap() {
        SaveOutcome::Written(again) => assert_eq!(again, path),
        SaveOutcome::PathRequired => panic!("path was recorded by save_to"),
    }
}
