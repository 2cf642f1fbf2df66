use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
};

use log::*;
use thiserror::Error;

use crate::{dot, graph::MapGraph, style::Style};

pub const OUTPUT_DIR: &str = "graphs";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Engine {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Turns a built map graph into files under `dir`.
pub trait Renderer {
    /// Returns the paths written, last one being the main output.
    fn render(&self, graph: &MapGraph, style: &Style, dir: &Path)
        -> Result<Vec<PathBuf>, RenderError>;
}

/// Writes the DOT source only.
#[derive(Debug, Clone)]
pub struct DotFile {
    pub ext: String,
}

/// Pipes the DOT source through a Graphviz layout program.
#[derive(Debug, Clone, Default)]
pub struct Graphviz {
    /// Also keep the DOT source, with this extension.
    pub raw_ext: Option<String>,
    /// Overrides the program picked from the style's engine.
    pub program: Option<PathBuf>,
}

impl Default for DotFile {
    fn default() -> Self {
        DotFile { ext: "gv".into() }
    }
}

fn output_path(dir: &Path, graph: &MapGraph, ext: &str) -> PathBuf {
    dir.join(format!("{}.{}", graph.name(), ext))
}

fn create_dir(dir: &Path) -> Result<(), RenderError> {
    fs::create_dir_all(dir).map_err(|source| RenderError::Io {
        path: dir.into(),
        source,
    })
}

fn write_dot_file(graph: &MapGraph, style: &Style, path: PathBuf) -> Result<PathBuf, RenderError> {
    info!("Rendering to {}", path.display());
    let io_err = |source: io::Error| RenderError::Io {
        path: path.clone(),
        source,
    };
    let mut file = io::BufWriter::new(fs::File::create(&path).map_err(io_err)?);
    dot::write_dot(graph, style, &mut file).map_err(io_err)?;
    file.flush().map_err(io_err)?;
    Ok(path)
}

impl Renderer for DotFile {
    fn render(
        &self,
        graph: &MapGraph,
        style: &Style,
        dir: &Path,
    ) -> Result<Vec<PathBuf>, RenderError> {
        create_dir(dir)?;
        let path = write_dot_file(graph, style, output_path(dir, graph, &self.ext))?;
        Ok(vec![path])
    }
}

impl Graphviz {
    pub fn new() -> Self {
        Graphviz::default()
    }

    pub fn with_raw(ext: impl Into<String>) -> Self {
        Graphviz {
            raw_ext: Some(ext.into()),
            program: None,
        }
    }

    fn program(&self, style: &Style) -> PathBuf {
        self.program
            .clone()
            .unwrap_or_else(|| style.engine.program().into())
    }
}

impl Renderer for Graphviz {
    fn render(
        &self,
        graph: &MapGraph,
        style: &Style,
        dir: &Path,
    ) -> Result<Vec<PathBuf>, RenderError> {
        create_dir(dir)?;

        let mut written = Vec::new();
        if let Some(ext) = &self.raw_ext {
            written.push(write_dot_file(graph, style, output_path(dir, graph, ext))?);
        }

        let path = output_path(dir, graph, &style.format);
        let program = self.program(style);
        let name = program.display().to_string();
        info!("Rendering to {}", path.display());

        let mut child = Command::new(&program)
            .arg(format!("-T{}", style.format))
            .arg("-o")
            .arg(&path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: name.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            match dot::write_dot(graph, style, &mut stdin) {
                Ok(()) => (),
                // The exit status below says what went wrong.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    warn!("{} closed its input early", name)
                }
                Err(source) => {
                    return Err(RenderError::Spawn {
                        program: name,
                        source,
                    })
                }
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|source| RenderError::Spawn {
                program: name.clone(),
                source,
            })?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(RenderError::Engine {
                program: name,
                status: output.status,
                stderr,
            });
        }
        if !stderr.is_empty() {
            warn!("{}: {}", name, stderr);
        }

        written.push(path);
        Ok(written)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        colour::Colour,
        graph,
        model::{City, GameMap, Route},
    };

    fn sample() -> MapGraph {
        let map = GameMap {
            name: "tiny".into(),
            cities: vec![City::new("a", "Alpha"), City::new("b", "Beta")],
            routes: vec![Route::new("a", "b", 2, Colour::Green)],
            tickets: Vec::new(),
            length_scale: Default::default(),
        };
        graph::build(&map, &Style::default()).unwrap()
    }

    #[test]
    fn test_dot_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("graphs");
        let style = Style::default();

        let paths = DotFile::default().render(&sample(), &style, &out).unwrap();
        assert_eq!(paths, vec![out.join("tiny.gv")]);

        let written = fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(written, dot::to_dot(&sample(), &style));
    }

    #[test]
    fn test_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Graphviz {
            raw_ext: None,
            program: Some(dir.path().join("no-such-graphviz")),
        };
        match renderer.render(&sample(), &Style::default(), dir.path()) {
            Err(RenderError::Spawn { .. }) => (),
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_engine_failure() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Graphviz {
            raw_ext: Some("dot".into()),
            program: Some("false".into()),
        };
        match renderer.render(&sample(), &Style::default(), dir.path()) {
            Err(RenderError::Engine { program, .. }) => assert_eq!(program, "false"),
            r => panic!("unexpected result: {:?}", r),
        }
        // The raw DOT is written before the engine runs.
        assert!(dir.path().join("tiny.dot").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_engine_success() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Graphviz {
            raw_ext: None,
            program: Some("true".into()),
        };
        let paths = renderer
            .render(&sample(), &Style::default(), dir.path())
            .unwrap();
        assert_eq!(paths, vec![dir.path().join("tiny.svg")]);
    }
}
