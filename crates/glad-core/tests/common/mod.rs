use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use glad_core::error::{GladError, Result};
use glad_core::remote::{RemoteFile, RemoteStore};
use glad_core::tools::RasterTools;

/// In-memory remote store; downloads write small placeholder files.
pub struct FakeStore {
    pub names: Vec<String>,
    pub list_calls: Cell<usize>,
    pub downloaded: RefCell<Vec<String>>,
}

impl FakeStore {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            list_calls: Cell::new(0),
            downloaded: RefCell::new(Vec::new()),
        }
    }

    /// Date and map tiles for `aoi` over `01`..`12`, `tiles` of each.
    pub fn with_tiles(aoi: &str, tiles: usize) -> Self {
        let mut names = Vec::new();
        for kind in ["date", "map"] {
            for i in 0..tiles {
                names.push(format!("alerts_{aoi}_01_12_{kind}-{i:04}.tif"));
            }
        }
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        Self::new(&refs)
    }
}

impl RemoteStore for FakeStore {
    fn list(&self, prefix: &str) -> Result<Vec<RemoteFile>> {
        self.list_calls.set(self.list_calls.get() + 1);
        let mut files: Vec<RemoteFile> = self
            .names
            .iter()
            .filter(|n| n.starts_with(prefix) && n.ends_with(".tif"))
            .map(|n| RemoteFile {
                name: n.clone(),
                location: format!("fake:{n}"),
            })
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    fn download(&self, files: &[RemoteFile], dest_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dest_dir)?;
        for file in files {
            std::fs::write(dest_dir.join(&file.name), b"tile")?;
            self.downloaded.borrow_mut().push(file.name.clone());
        }
        Ok(())
    }
}

/// Raster tools that write placeholder outputs and record every call.
pub struct FakeTools {
    pub calls: RefCell<Vec<String>>,
    pub merge_inputs: RefCell<Vec<Vec<PathBuf>>>,
    pub stats_text: String,
    /// Tool name that fails after writing a partial output.
    pub fail_on: Option<&'static str>,
}

impl FakeTools {
    pub fn new(stats_text: &str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            merge_inputs: RefCell::new(Vec::new()),
            stats_text: stats_text.to_string(),
            fail_on: None,
        }
    }

    pub fn failing(stats_text: &str, tool: &'static str) -> Self {
        Self {
            fail_on: Some(tool),
            ..Self::new(stats_text)
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn invoke(&self, tool: &str, output: &Path, contents: &[u8]) -> Result<String> {
        self.calls.borrow_mut().push(tool.to_string());
        std::fs::write(output, contents)?;
        if self.fail_on == Some(tool) {
            return Err(GladError::ToolFailed {
                tool: tool.to_string(),
                status: "exit status: 1".into(),
                output: "simulated failure".into(),
            });
        }
        Ok(format!("{tool} ok\n"))
    }
}

impl RasterTools for FakeTools {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<String> {
        self.merge_inputs.borrow_mut().push(inputs.to_vec());
        self.invoke("merge", output, b"merged")
    }

    fn translate_lzw(&self, input: &Path, output: &Path) -> Result<String> {
        let data = std::fs::read(input)?;
        self.invoke("translate", output, &data)
    }

    fn clump(&self, input: &Path, output: &Path) -> Result<String> {
        assert!(input.is_file(), "clump input missing: {}", input.display());
        self.invoke("clump", output, b"clumps")
    }

    fn histogram(&self, input: &Path, output: &Path, mask: &Path, max_value: u32) -> Result<String> {
        assert!(input.is_file() && mask.is_file());
        assert_eq!(max_value, 3);
        let text = self.stats_text.clone();
        self.invoke("histogram", output, text.as_bytes())
    }
}

pub const STATS: &str = "1 100 0 0 50 50\n2 200 0 0 0 200\n";
