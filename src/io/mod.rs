//! Text input and output: streaming reader, rasterizer, lattice export.

pub mod line_reader;
pub mod vertex;
pub mod rasterize;
pub mod export;

pub use line_reader::{read_file_lines, read_file_lines_async, read_lines, LineSink, LineSplitter, DEFAULT_CHUNK_SIZE};
pub use vertex::parse_vertex_line;
pub use rasterize::{rasterize_file, rasterize_file_async, rasterize_lines, RasterConfig, Rasterizer, SampleExtent};
pub use export::{export_lines, import_lattice, import_lattice_file, write_export, LatticeImporter};
