//! Build script for scenepad-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Checks every scene file under `scenes/` at compile time
//! - Generates the table of embedded scene files

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory holding one TOML file per scene
const SCENES_DIR: &str = "scenes";

/// Must match `MAX_BINDINGS` in scenepad-core
const MAX_BINDINGS: usize = 13;

/// Must match `MAX_SCENES` in scenepad-core
const MAX_SCENES: usize = 16;

fn main() {
    setup_linker();
    let scenes = collect_scenes();
    for path in &scenes {
        check_scene(path);
    }
    generate_scene_table(&scenes);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Scene files in name order, which is also the load order
fn collect_scenes() -> Vec<PathBuf> {
    println!("cargo:rerun-if-changed={}", SCENES_DIR);

    let dir = Path::new(SCENES_DIR);
    if !dir.is_dir() {
        println!(
            "cargo:warning={}/ not found, the firmware will start with no scenes",
            SCENES_DIR
        );
        return Vec::new();
    }

    let mut scenes: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    scenes.sort();

    for path in &scenes {
        println!("cargo:rerun-if-changed={}", path.display());
    }
    if scenes.len() > MAX_SCENES {
        println!(
            "cargo:warning={} scene files but only {} fit, the rest will be dropped",
            scenes.len(),
            MAX_SCENES
        );
    }
    scenes
}

/// Check one scene file
///
/// A bad scene file does not fail the build: the device skips it at
/// startup and keeps the others, so problems are reported as warnings.
fn check_scene(path: &Path) {
    let file = path.display();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning={}: unreadable: {}", file, e);
            return;
        }
    };

    let scene: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let first_line = e.to_string().lines().next().unwrap_or_default().to_string();
            println!("cargo:warning={}: invalid TOML: {}", file, first_line);
            return;
        }
    };

    for problem in scene_problems(&scene) {
        println!("cargo:warning={}: {}", file, problem);
    }
}

/// Everything the device would log or reject for this scene
fn scene_problems(scene: &toml::Value) -> Vec<String> {
    let mut problems = Vec::new();

    match scene.get("id") {
        Some(toml::Value::String(_)) => {}
        Some(_) => problems.push("'id' must be a string".to_string()),
        None => problems.push("no 'id', the scene cannot be selected".to_string()),
    }
    if !matches!(scene.get("name"), Some(toml::Value::String(_))) {
        problems.push("missing 'name', the file will be skipped".to_string());
    }

    let macros = match scene.get("macros") {
        Some(toml::Value::Array(macros)) => macros,
        Some(_) => {
            problems.push("'macros' must be an array of tables".to_string());
            return problems;
        }
        None => return problems,
    };

    if macros.len() > MAX_BINDINGS {
        problems.push(format!(
            "{} macros, at most {} are allowed",
            macros.len(),
            MAX_BINDINGS
        ));
    }

    for (i, binding) in macros.iter().enumerate() {
        let Some(binding) = binding.as_table() else {
            problems.push(format!("macro {} must be a table", i));
            continue;
        };
        if let Some(color) = binding.get("color") {
            match color.as_integer() {
                Some(c) if (0..=0xFF_FFFF).contains(&c) => {}
                _ => problems.push(format!("macro {} color must be 0x000000-0xFFFFFF", i)),
            }
        }
        if let Some(actions) = binding.get("actions").and_then(|a| a.as_array()) {
            for (j, action) in actions.iter().enumerate() {
                if let Some(problem) = action_problem(action) {
                    problems.push(format!("macro {} action {}: {}", i, j, problem));
                }
            }
        }
    }

    problems
}

fn action_problem(action: &toml::Value) -> Option<String> {
    let Some(action) = action.as_table() else {
        return Some("legacy action format, will be skipped".to_string());
    };
    let kind = action.get("type").and_then(|t| t.as_str());
    match kind {
        Some("scene") => match action.get("dest") {
            Some(toml::Value::String(_)) => None,
            _ => Some("scene action needs a string 'dest'".to_string()),
        },
        Some("press") => match action.get("keys") {
            Some(toml::Value::Array(_)) => None,
            _ => Some("press action needs a 'keys' array".to_string()),
        },
        Some("consumer") => match action.get("code").and_then(|c| c.as_integer()) {
            Some(code) if (0..=0xFFFF).contains(&code) => None,
            _ => Some("consumer action needs a 16-bit 'code'".to_string()),
        },
        Some("mouse") => None,
        Some("tone") => match action.get("frequency").and_then(|f| f.as_integer()) {
            Some(f) if f > 0 && f <= 0xFFFF => None,
            _ => Some("tone action needs a positive 'frequency'".to_string()),
        },
        Some(other) => Some(format!("unknown action type '{}', will be skipped", other)),
        None => Some("action has no 'type', will be skipped".to_string()),
    }
}

/// Write `scenes.rs` listing every scene file as `(file name, contents)`
fn generate_scene_table(scenes: &[PathBuf]) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());

    let mut out = String::from("pub static SCENE_FILES: &[(&str, &str)] = &[\n");
    for path in scenes {
        let name = path.file_name().unwrap().to_string_lossy();
        let absolute = manifest_dir.join(path);
        out.push_str(&format!(
            "    ({:?}, include_str!({:?})),\n",
            name,
            absolute.display().to_string()
        ));
    }
    out.push_str("];\n");

    fs::write(out_dir.join("scenes.rs"), out).unwrap();
}
