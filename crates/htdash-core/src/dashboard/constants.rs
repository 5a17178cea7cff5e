//! Tile layout constants

/// Space between the tile edge and its content
pub const TILE_PADDING_PX: u32 = 8;

/// Vertical space between the tile's text lines and the sparkline
pub const TILE_LINE_GAP_PX: u32 = 4;

/// Tile outline width
pub const TILE_BORDER_WIDTH_PX: u32 = 1;

/// Width reserved for the `H:MM` clock label on the name line
pub const CLOCK_LABEL_WIDTH_PX: u32 = 32;

/// Display size the simulator opens with
pub const DEFAULT_DISPLAY_WIDTH_PX: u32 = 800;
pub const DEFAULT_DISPLAY_HEIGHT_PX: u32 = 480;
