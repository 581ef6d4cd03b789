// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbaImage;
use unicode_width::UnicodeWidthChar;

use decterm_buffer::{
    cell::Cell,
    image_slice::{ImageSlice, WidthRole},
    line::DoubleHeight,
    screen::{EraseStyle, Screen},
};
use decterm_common::{
    charsets::{GlLockShift, GrLockShift, SingleShift, map_codepoint},
    colors::{Palette, Rgb, TerminalColor},
    device::DeviceType,
    terminal_size::MAX_JEXER_IMAGE_DIMENSION,
};

use crate::{
    ansi::TerminalCommand,
    ansi_components::{
        dcs,
        mode::{KeypadMode, SetMode, TerminalModes},
        modes::{
            ReportMode, decckm::Decckm, decscnm::Decscnm, decsdm::Decsdm, dectcem::Dectcem,
            irm::Irm, lnm::Lnm,
            mouse::{MouseEncoding, MouseTrack},
            sync_updates::SynchronizedUpdates,
        },
        osc::{ImageExtent, InlineImage, JexerImage},
        scanner::Scanner,
        sgr::SelectGraphicRendition,
        sixel::{SixelDecoder, SixelPalette, default_sixel_palette},
    },
    input::{KeyEncodeContext, MouseEncodeContext},
    interface::TerminalConfig,
    io::{ColorBackend, DisplayListener, DisplaySnapshot},
};

use super::{saved::SavedState, tabs::TabStops};

/// How long a synchronized-update window may serve a stale snapshot.
const SYNC_SNAPSHOT_MAX_AGE: Duration = Duration::from_millis(125);

/// The terminal proper: display model, modes, saveable state, palette,
/// and the dispatcher that turns scanner commands into mutations and
/// outbound bytes. One mutex-guarded instance per terminal.
pub struct TerminalState {
    pub scanner: Scanner,
    pub screen: Screen,
    pub modes: TerminalModes,
    pub current: SavedState,
    pub saved: SavedState,
    pub tabs: TabStops,
    pub palette: Palette,
    sixel_palette: SixelPalette,
    device_type: DeviceType,
    title: String,
    cursor_style: u16,
    wrap_line_flag: bool,
    dirty: bool,
    read_count: u64,
    text_width: usize,
    text_height: usize,
    last_snapshot: Option<(Instant, DisplaySnapshot)>,
    write_tx: crossbeam_channel::Sender<Vec<u8>>,
    listener: Arc<dyn DisplayListener>,
    backend: Arc<dyn ColorBackend>,
}

impl TerminalState {
    #[must_use]
    pub fn new(
        config: &TerminalConfig,
        write_tx: crossbeam_channel::Sender<Vec<u8>>,
        listener: Arc<dyn DisplayListener>,
        backend: Arc<dyn ColorBackend>,
    ) -> Self {
        Self {
            scanner: Scanner::new(),
            screen: Screen::new(config.width, config.height, config.scrollback_max),
            modes: TerminalModes::default(),
            current: SavedState::default(),
            saved: SavedState::default(),
            tabs: TabStops::with_default_stops(config.width),
            palette: Palette::default(),
            sixel_palette: default_sixel_palette(),
            device_type: config.device_type,
            title: String::new(),
            cursor_style: 1,
            wrap_line_flag: false,
            dirty: true,
            read_count: 0,
            text_width: config.text_width,
            text_height: config.text_height,
            last_snapshot: None,
            write_tx,
            listener,
            backend,
        }
    }

    // ------------------------------------------------------------------
    // Small accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn device_type(&self) -> DeviceType {
        self.device_type
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn read_count(&self) -> u64 {
        self.read_count
    }

    /// DECSCUSR shape, recorded for the embedder's cursor rendering.
    #[must_use]
    pub const fn cursor_style(&self) -> u16 {
        self.cursor_style
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub const fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    #[must_use]
    pub const fn wrap_pending(&self) -> bool {
        self.wrap_line_flag
    }

    #[must_use]
    pub const fn cursor(&self) -> (usize, usize) {
        (self.current.cursor_x, self.current.cursor_y)
    }

    /// The wire-encoding context for keyboard translation.
    #[must_use]
    pub const fn key_context(&self) -> KeyEncodeContext {
        KeyEncodeContext {
            device: self.device_type,
            application_cursor_keys: matches!(self.modes.cursor_keys, Decckm::Application),
            application_keypad: matches!(self.modes.keypad, KeypadMode::Application),
            new_line: self.modes.new_line.is_new_line(),
            vt52: self.scanner.is_vt52_mode(),
            full_duplex: self.modes.full_duplex,
        }
    }

    /// The wire-encoding context for mouse translation.
    #[must_use]
    pub const fn mouse_context(&self) -> MouseEncodeContext {
        MouseEncodeContext {
            protocol: self.modes.mouse_protocol,
            encoding: self.modes.mouse_encoding,
            text_width: self.text_width,
            text_height: self.text_height,
        }
    }

    /// Effective rightmost column for the cursor's row; double-width
    /// rows only address half the screen.
    #[must_use]
    pub fn right_margin(&self) -> usize {
        let full = self.screen.width().saturating_sub(1);
        let double = self
            .screen
            .line(self.current.cursor_y)
            .is_some_and(|line| line.double_width);
        if double { self.screen.width() / 2 - 1 } else { full }
    }

    const fn erase_style(&self) -> EraseStyle {
        match self.device_type {
            DeviceType::Xterm => EraseStyle::BackColor,
            _ => EraseStyle::Vt10x,
        }
    }

    fn scroll_fill(&self) -> Cell {
        Cell::blank_with(self.current.attributes)
    }

    const fn reverse_flag(&self) -> bool {
        self.modes.reverse_screen.is_reversed()
    }

    // ------------------------------------------------------------------
    // Ingest
    // ------------------------------------------------------------------

    /// Feed decoded code points. The consume path is total; anything
    /// malformed is logged and dropped inside the scanner.
    pub fn handle_incoming(&mut self, text: &str) {
        let mut commands = Vec::new();
        for c in text.chars() {
            self.read_count += 1;
            self.scanner.consume(c, &mut commands);
        }
        self.scanner.flush(&mut commands);
        for command in commands {
            self.dispatch(command);
        }
    }

    #[allow(clippy::too_many_lines)]
    pub fn dispatch(&mut self, command: TerminalCommand) {
        match command {
            TerminalCommand::Text(text) => self.print_text(&text),
            TerminalCommand::Bell => self.listener.bell(),
            TerminalCommand::Backspace => {
                self.current.cursor_x = self.current.cursor_x.saturating_sub(1);
                self.wrap_line_flag = false;
            }
            TerminalCommand::HorizontalTab => self.advance_to_next_tab_stop(),
            TerminalCommand::LineFeed => {
                self.line_feed_scroll();
                if self.modes.new_line.is_new_line() {
                    self.current.cursor_x = 0;
                }
                self.wrap_line_flag = false;
            }
            TerminalCommand::CarriageReturn => {
                self.current.cursor_x = 0;
                self.wrap_line_flag = false;
            }
            TerminalCommand::ShiftOut => self.current.charsets.shift_out = true,
            TerminalCommand::ShiftIn => self.current.charsets.shift_out = false,

            TerminalCommand::Index => {
                self.line_feed_scroll();
                self.wrap_line_flag = false;
            }
            TerminalCommand::ReverseIndex => self.reverse_index(),
            TerminalCommand::NextLine => {
                self.line_feed_scroll();
                self.current.cursor_x = 0;
                self.wrap_line_flag = false;
            }
            TerminalCommand::TabSet => self.tabs.set(self.current.cursor_x),
            TerminalCommand::SingleShiftG2 => {
                self.current.charsets.singleshift = SingleShift::Ss2;
            }
            TerminalCommand::SingleShiftG3 => {
                self.current.charsets.singleshift = SingleShift::Ss3;
            }
            TerminalCommand::SaveCursor => self.save_cursor(),
            TerminalCommand::RestoreCursor => self.restore_cursor(),
            TerminalCommand::KeypadApplication => self.modes.keypad = KeypadMode::Application,
            TerminalCommand::KeypadNumeric => self.modes.keypad = KeypadMode::Numeric,
            TerminalCommand::FullReset => self.full_reset(),
            TerminalCommand::SoftReset => self.soft_reset(),
            TerminalCommand::ReturnTerminalId => self.report_device_attributes(),
            TerminalCommand::SetC1Transmission(enabled) => self.modes.s8c1t = enabled,
            TerminalCommand::DoubleHeightTop => self.set_line_shape(true, DoubleHeight::Top),
            TerminalCommand::DoubleHeightBottom => self.set_line_shape(true, DoubleHeight::Bottom),
            TerminalCommand::SingleWidthLine => self.set_line_shape(false, DoubleHeight::None),
            TerminalCommand::DoubleWidthLine => self.set_line_shape(true, DoubleHeight::None),
            TerminalCommand::ScreenAlignmentTest => {
                self.screen.alignment_fill();
                self.current.cursor_x = 0;
                self.current.cursor_y = 0;
                self.dirty = true;
            }
            TerminalCommand::DesignateCharset { slot, charset } => {
                self.current.charsets.set_slot(slot, charset);
            }
            TerminalCommand::LockShiftG2Gl => self.current.charsets.lockshift_gl = GlLockShift::G2,
            TerminalCommand::LockShiftG3Gl => self.current.charsets.lockshift_gl = GlLockShift::G3,
            TerminalCommand::LockShiftG1Gr => self.current.charsets.lockshift_gr = GrLockShift::G1,
            TerminalCommand::LockShiftG2Gr => self.current.charsets.lockshift_gr = GrLockShift::G2,
            TerminalCommand::LockShiftG3Gr => self.current.charsets.lockshift_gr = GrLockShift::G3,

            TerminalCommand::CursorUp(n) => self.cursor_up(n, true),
            TerminalCommand::CursorDown(n) => self.cursor_down(n, true),
            TerminalCommand::CursorForward(n) => self.cursor_right(n),
            TerminalCommand::CursorBack(n) => self.cursor_left(n),
            TerminalCommand::CursorNextLine(n) => {
                self.cursor_down(n, true);
                self.current.cursor_x = 0;
            }
            TerminalCommand::CursorPrevLine(n) => {
                self.cursor_up(n, true);
                self.current.cursor_x = 0;
            }
            TerminalCommand::CursorColumn(col) => {
                self.current.cursor_x = (col - 1).min(self.right_margin());
                self.wrap_line_flag = false;
            }
            TerminalCommand::CursorColumnRelative(n) => self.cursor_right(n),
            TerminalCommand::CursorRow(row) => {
                self.cursor_position_absolute(row, self.current.cursor_x + 1, false);
            }
            TerminalCommand::CursorRowRelative(n) => self.cursor_down(n, false),
            TerminalCommand::CursorPosition { row, col } => {
                self.cursor_position_absolute(row, col, true);
            }

            TerminalCommand::EraseDisplay { mode, selective } => {
                self.erase_display(mode, selective);
            }
            TerminalCommand::EraseLine { mode, selective } => self.erase_line(mode, selective),
            TerminalCommand::InsertLines(n) => self.insert_lines(n),
            TerminalCommand::DeleteLines(n) => self.delete_lines(n),
            TerminalCommand::InsertChars(n) => self.insert_chars(n),
            TerminalCommand::DeleteChars(n) => self.delete_chars(n),
            TerminalCommand::EraseChars(n) => self.erase_chars(n),
            TerminalCommand::ScrollUp(n) => {
                let (top, bottom) = (self.screen.scroll_region_top, self.screen.scroll_region_bottom);
                let fill = self.scroll_fill();
                self.screen.scroll_up(top, bottom, n, &fill, self.reverse_flag());
                self.dirty = true;
            }
            TerminalCommand::ScrollDown(n) => {
                let (top, bottom) = (self.screen.scroll_region_top, self.screen.scroll_region_bottom);
                let fill = self.scroll_fill();
                self.screen.scroll_down(top, bottom, n, &fill, self.reverse_flag());
                self.dirty = true;
            }

            TerminalCommand::Sgr(ops) => self.apply_sgr(&ops),
            TerminalCommand::SetModes { private, set, params } => {
                let mode = if set { SetMode::Set } else { SetMode::Reset };
                for param in params {
                    self.apply_mode(param, private, mode);
                }
            }
            TerminalCommand::RequestMode { private, param } => self.report_mode(private, param),
            TerminalCommand::DeviceAttributes => self.report_device_attributes(),
            TerminalCommand::SecondaryDeviceAttributes => self.report_secondary_attributes(),
            TerminalCommand::TertiaryDeviceAttributes => self.report_tertiary_attributes(),
            TerminalCommand::DeviceStatusReport { private, param } => {
                self.report_device_status(private, param);
            }
            TerminalCommand::SetScrollRegion { top, bottom } => self.set_scroll_region(top, bottom),
            TerminalCommand::TabClear(param) => match param {
                0 => self.tabs.clear_at(self.current.cursor_x),
                3 => self.tabs.clear_all(),
                other => debug!("TBC with unsupported selector {other}"),
            },
            TerminalCommand::RequestTerminalParameters(param) => {
                self.report_terminal_parameters(param);
            }
            TerminalCommand::SetProtection(protect) => {
                self.current.attributes.set_protected(protect);
            }
            TerminalCommand::CursorStyle(style) => self.cursor_style = style,
            TerminalCommand::XtVersion => self.report_xt_version(),
            TerminalCommand::MediaCopy { private, param } => {
                // VT220 printer functions are recognized but only the
                // controller toggle has an observable effect.
                if !private {
                    match param {
                        5 => self.modes.printer_controller = true,
                        4 => self.modes.printer_controller = false,
                        other => debug!("media copy {other} ignored"),
                    }
                }
            }

            TerminalCommand::Vt52EnterAnsiMode => self.scanner.set_vt52_mode(false),
            TerminalCommand::Vt52Identify => self.respond(b"\x1b/Z".to_vec()),
            TerminalCommand::Vt52CursorAddress { row, col } => {
                self.cursor_position_absolute(row + 1, col + 1, true);
            }
            TerminalCommand::Vt52EnterGraphics => self.current.charsets.shift_out = true,
            TerminalCommand::Vt52ExitGraphics => self.current.charsets.shift_out = false,

            TerminalCommand::OscSetTitle(title) => {
                self.listener.title_changed(&title);
                self.title = title;
            }
            TerminalCommand::OscPaletteQuery(idx) => self.report_palette_entry(idx),
            TerminalCommand::OscPaletteSet(idx, rgb) => self.palette.set(idx, rgb),
            TerminalCommand::OscQueryForeground => {
                let spec = self.backend.default_foreground().to_x11_spec();
                self.respond_osc(&format!("10;{spec}"));
            }
            TerminalCommand::OscQueryBackground => {
                let spec = self.backend.default_background().to_x11_spec();
                self.respond_osc(&format!("11;{spec}"));
            }
            TerminalCommand::JexerImage(image) => self.place_jexer_image(image),
            TerminalCommand::InlineImage(image) => self.place_inline_image(image),
            TerminalCommand::XtGetTcap(names) => self.report_termcaps(&names),
            TerminalCommand::HideMousePointer | TerminalCommand::ShowMousePointer => {
                // pointer visibility belongs to the embedder
            }
            TerminalCommand::SixelData { params, data } => self.decode_sixel(&params, &data),

            TerminalCommand::Ignored => {}
        }
    }

    // ------------------------------------------------------------------
    // Printing
    // ------------------------------------------------------------------

    fn print_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.print_char(ch);
        }
    }

    fn print_char(&mut self, ch: char) {
        if self.modes.printer_controller {
            return;
        }

        let mapped = map_codepoint(
            u32::from(ch),
            self.scanner.is_vt52_mode(),
            &self.current.charsets,
        );
        self.current.charsets.singleshift = SingleShift::None;

        let Some(width) = UnicodeWidthChar::width(mapped) else {
            return;
        };
        if width == 0 {
            return;
        }

        // VT100 delayed autowrap: the wrap armed by the previous print
        // fires only now, before this glyph lands.
        if self.wrap_line_flag
            && self.current.line_wrap
            && self.current.cursor_x >= self.right_margin()
        {
            self.current.cursor_x = 0;
            self.line_feed_scroll();
            self.wrap_line_flag = false;
        }

        let wide = width == 2;
        let margin = self.right_margin();
        if wide && self.current.cursor_x >= margin {
            // the right half would pass the margin; place the pair on
            // the next line instead
            if self.current.line_wrap {
                self.current.cursor_x = 0;
                self.line_feed_scroll();
            } else {
                self.current.cursor_x = margin.saturating_sub(1);
            }
        }

        let attrs = self.current.attributes;
        let x = self.current.cursor_x;
        let y = self.current.cursor_y;
        let insert = self.modes.insert.is_insert();
        if let Some(line) = self.screen.line_mut(y) {
            let cell = Cell::new(mapped, attrs);
            if insert {
                if wide {
                    line.insert(x, Cell::blank_with(attrs));
                }
                line.insert(x, cell);
            } else {
                line.replace(x, cell);
                if wide {
                    line.replace(x + 1, Cell::blank_with(attrs));
                }
            }
        }

        let margin = self.right_margin();
        let last = x + width - 1;
        if last >= margin {
            self.current.cursor_x = margin;
            self.wrap_line_flag = self.current.line_wrap;
        } else {
            self.current.cursor_x = x + width;
        }
        self.dirty = true;
    }

    fn advance_to_next_tab_stop(&mut self) {
        let margin = self.right_margin();
        self.current.cursor_x = self.tabs.next_stop(self.current.cursor_x, margin);
    }

    // ------------------------------------------------------------------
    // Vertical movement and scrolling
    // ------------------------------------------------------------------

    /// LF/IND at the bottom of the scroll region scrolls; a full-screen
    /// region promotes the top line into scrollback instead.
    fn line_feed_scroll(&mut self) {
        let top = self.screen.scroll_region_top;
        let bottom = self.screen.scroll_region_bottom;
        if self.current.cursor_y == bottom {
            let fill = self.scroll_fill();
            let reverse = self.reverse_flag();
            if top == 0 && bottom == self.screen.height() - 1 {
                self.screen.promote_top_line(&fill, reverse);
            } else {
                self.screen.scroll_up(top, bottom, 1, &fill, reverse);
            }
        } else if self.current.cursor_y < self.screen.height() - 1 {
            self.current.cursor_y += 1;
        }
        self.dirty = true;
    }

    fn reverse_index(&mut self) {
        let top = self.screen.scroll_region_top;
        let bottom = self.screen.scroll_region_bottom;
        if self.current.cursor_y == top {
            let fill = self.scroll_fill();
            let reverse = self.reverse_flag();
            self.screen.scroll_down(top, bottom, 1, &fill, reverse);
        } else if self.current.cursor_y > 0 {
            self.current.cursor_y -= 1;
        }
        self.wrap_line_flag = false;
        self.dirty = true;
    }

    fn cursor_up(&mut self, n: usize, honor_scroll_region: bool) {
        let top = if honor_scroll_region && self.current.cursor_y >= self.screen.scroll_region_top
        {
            self.screen.scroll_region_top
        } else {
            0
        };
        self.current.cursor_y = self.current.cursor_y.saturating_sub(n).max(top);
        if n > 0 {
            self.wrap_line_flag = false;
        }
    }

    fn cursor_down(&mut self, n: usize, honor_scroll_region: bool) {
        let bottom =
            if honor_scroll_region && self.current.cursor_y <= self.screen.scroll_region_bottom {
                self.screen.scroll_region_bottom
            } else {
                self.screen.height() - 1
            };
        self.current.cursor_y = (self.current.cursor_y + n).min(bottom);
        if n > 0 {
            self.wrap_line_flag = false;
        }
    }

    fn cursor_right(&mut self, n: usize) {
        self.current.cursor_x = (self.current.cursor_x + n).min(self.right_margin());
        if n > 0 {
            self.wrap_line_flag = false;
        }
    }

    fn cursor_left(&mut self, n: usize) {
        self.current.cursor_x = self.current.cursor_x.saturating_sub(n);
        if n > 0 {
            self.wrap_line_flag = false;
        }
    }

    /// CUP and friends; 1-based wire coordinates. Origin mode pins the
    /// row inside the scroll region.
    fn cursor_position_absolute(&mut self, row: usize, col: usize, set_col: bool) {
        let row = row.saturating_sub(1);
        let col = col.saturating_sub(1);
        if self.current.origin_mode {
            let top = self.screen.scroll_region_top;
            let bottom = self.screen.scroll_region_bottom;
            self.current.cursor_y = (top + row).clamp(top, bottom);
        } else {
            self.current.cursor_y = row.min(self.screen.height() - 1);
        }
        if set_col {
            self.current.cursor_x = col.min(self.right_margin());
        } else {
            self.current.cursor_x = self.current.cursor_x.min(self.right_margin());
        }
        self.wrap_line_flag = false;
    }

    fn set_scroll_region(&mut self, top: Option<u16>, bottom: Option<u16>) {
        let top = usize::from(top.unwrap_or(1)).max(1) - 1;
        let bottom = usize::from(bottom.unwrap_or(0));
        let bottom = if bottom == 0 {
            self.screen.height() - 1
        } else {
            (bottom - 1).min(self.screen.height() - 1)
        };
        if self.screen.set_scroll_region(top, bottom) {
            // DECSTBM homes the cursor (honoring origin mode)
            let home_row = if self.current.origin_mode { top } else { 0 };
            self.current.cursor_y = home_row;
            self.current.cursor_x = 0;
            self.wrap_line_flag = false;
        }
    }

    // ------------------------------------------------------------------
    // Erase and edit
    // ------------------------------------------------------------------

    fn erase_display(&mut self, mode: u16, selective: bool) {
        let attrs = self.current.attributes;
        let style = self.erase_style();
        let (cx, cy) = (self.current.cursor_x, self.current.cursor_y);
        let last_row = self.screen.height() - 1;
        let last_col = self.screen.width() - 1;
        match mode {
            0 => self
                .screen
                .erase_screen(cy, cx, last_row, last_col, attrs, style, selective),
            1 => self.screen.erase_screen(0, 0, cy, cx, attrs, style, selective),
            2 => self
                .screen
                .erase_screen(0, 0, last_row, last_col, attrs, style, selective),
            3 => {
                if self.device_type == DeviceType::Xterm {
                    self.screen.clear_scrollback();
                }
                self.screen
                    .erase_screen(0, 0, last_row, last_col, attrs, style, selective);
            }
            other => debug!("ED with unsupported selector {other}"),
        }
        self.dirty = true;
    }

    fn erase_line(&mut self, mode: u16, selective: bool) {
        let attrs = self.current.attributes;
        let style = self.erase_style();
        let (cx, cy) = (self.current.cursor_x, self.current.cursor_y);
        let last_col = self.screen.width() - 1;
        match mode {
            0 => self.screen.erase_line(cy, cx, last_col, attrs, style, selective),
            1 => self.screen.erase_line(cy, 0, cx, attrs, style, selective),
            2 => self.screen.erase_line(cy, 0, last_col, attrs, style, selective),
            other => debug!("EL with unsupported selector {other}"),
        }
        self.dirty = true;
    }

    fn insert_lines(&mut self, n: usize) {
        let (top, bottom) = (self.screen.scroll_region_top, self.screen.scroll_region_bottom);
        let y = self.current.cursor_y;
        if y < top || y > bottom {
            return;
        }
        let fill = self.scroll_fill();
        self.screen.scroll_down(y, bottom, n, &fill, self.reverse_flag());
        self.dirty = true;
    }

    fn delete_lines(&mut self, n: usize) {
        let (top, bottom) = (self.screen.scroll_region_top, self.screen.scroll_region_bottom);
        let y = self.current.cursor_y;
        if y < top || y > bottom {
            return;
        }
        let fill = self.scroll_fill();
        self.screen.scroll_up(y, bottom, n, &fill, self.reverse_flag());
        self.dirty = true;
    }

    fn insert_chars(&mut self, n: usize) {
        let fill = self.erase_style().fill(self.current.attributes);
        let x = self.current.cursor_x;
        if let Some(line) = self.screen.line_mut(self.current.cursor_y) {
            for _ in 0..n {
                line.insert(x, fill.clone());
            }
        }
        self.dirty = true;
    }

    fn delete_chars(&mut self, n: usize) {
        let fill = self.erase_style().fill(self.current.attributes);
        let x = self.current.cursor_x;
        if let Some(line) = self.screen.line_mut(self.current.cursor_y) {
            for _ in 0..n {
                line.delete(x, fill.clone());
            }
        }
        self.dirty = true;
    }

    fn erase_chars(&mut self, n: usize) {
        let attrs = self.current.attributes;
        let style = self.erase_style();
        let start = self.current.cursor_x;
        let end = (start + n).saturating_sub(1);
        self.screen
            .erase_line(self.current.cursor_y, start, end, attrs, style, false);
        self.dirty = true;
    }

    // ------------------------------------------------------------------
    // Attributes and modes
    // ------------------------------------------------------------------

    fn apply_sgr(&mut self, ops: &[SelectGraphicRendition]) {
        for op in ops {
            match op {
                SelectGraphicRendition::Reset => self.current.attributes.reset(),
                SelectGraphicRendition::Bold => self.current.attributes.set_bold(true),
                SelectGraphicRendition::NormalIntensity => {
                    self.current.attributes.set_bold(false);
                }
                SelectGraphicRendition::Underline => self.current.attributes.set_underline(true),
                SelectGraphicRendition::NotUnderlined => {
                    self.current.attributes.set_underline(false);
                }
                SelectGraphicRendition::Blink => self.current.attributes.set_blink(true),
                SelectGraphicRendition::Steady => self.current.attributes.set_blink(false),
                SelectGraphicRendition::Reverse => self.current.attributes.set_reverse(true),
                SelectGraphicRendition::NotReversed => {
                    self.current.attributes.set_reverse(false);
                }
                SelectGraphicRendition::Foreground(color) => {
                    self.current.attributes.set_foreground(*color);
                }
                SelectGraphicRendition::Background(color) => {
                    self.current.attributes.set_background(*color);
                }
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn apply_mode(&mut self, param: u16, private: bool, mode: SetMode) {
        let set = mode.is_set();
        match (private, param) {
            (true, 1) => self.modes.cursor_keys = Decckm::new(mode),
            (true, 2) => {
                // DECANM: reset drops to VT52, set returns to ANSI
                self.scanner.set_vt52_mode(!set);
            }
            (true, 3) => self.set_columns(set),
            (true, 4) => self.modes.smooth_scroll = set,
            (true, 5) => self.set_reverse_screen(mode),
            (true, 6) => {
                self.current.origin_mode = set;
                let home = if set { self.screen.scroll_region_top } else { 0 };
                self.current.cursor_y = home;
                self.current.cursor_x = 0;
                self.wrap_line_flag = false;
            }
            (true, 7) => self.current.line_wrap = set,
            (true, 9) => {
                self.modes.mouse_protocol = if set { MouseTrack::X10 } else { MouseTrack::Off };
            }
            (true, 25) => self.modes.cursor_visible = Dectcem::new(mode),
            (true, 80) => self.modes.sixel_scrolling_disabled = Decsdm::new(mode),
            (true, 1000) => {
                self.modes.mouse_protocol = if set { MouseTrack::Normal } else { MouseTrack::Off };
            }
            (true, 1002) => {
                self.modes.mouse_protocol = if set {
                    MouseTrack::ButtonEvent
                } else {
                    MouseTrack::Off
                };
            }
            (true, 1003) => {
                self.modes.mouse_protocol = if set {
                    MouseTrack::AnyEvent
                } else {
                    MouseTrack::Off
                };
            }
            (true, 1005) => self.set_mouse_encoding(MouseEncoding::Utf8, set),
            (true, 1006) => self.set_mouse_encoding(MouseEncoding::Sgr, set),
            (true, 1016) => self.set_mouse_encoding(MouseEncoding::SgrPixels, set),
            (true, 1047) => {
                // the alternate screen is emulated as an erase
                self.erase_display(2, false);
            }
            (true, 1048) => {
                if set {
                    self.save_cursor();
                } else {
                    self.restore_cursor();
                }
            }
            (true, 1049) => {
                if set {
                    self.save_cursor();
                    self.erase_display(2, false);
                } else {
                    self.erase_display(2, false);
                    self.restore_cursor();
                }
            }
            (true, 1070) => self.modes.shared_sixel_palette = set,
            (true, 2026) => {
                self.modes.synchronized_updates = SynchronizedUpdates::new(mode);
                if !set {
                    // flush the frozen snapshot
                    self.last_snapshot = None;
                    self.dirty = true;
                }
            }
            (false, 4) => self.modes.insert = Irm::new(mode),
            (false, 20) => self.modes.new_line = Lnm::new(mode),
            (_, other) => {
                debug!("unsupported mode {}{other}", if private { "?" } else { "" });
            }
        }
    }

    fn set_mouse_encoding(&mut self, encoding: MouseEncoding, set: bool) {
        if set {
            self.modes.mouse_encoding = encoding;
        } else if self.modes.mouse_encoding == encoding {
            self.modes.mouse_encoding = MouseEncoding::X10;
        }
    }

    fn set_reverse_screen(&mut self, mode: SetMode) {
        self.modes.reverse_screen = Decscnm::new(mode);
        let reversed = self.modes.reverse_screen.is_reversed();
        for row in 0..self.screen.height() {
            if let Some(line) = self.screen.line_mut(row) {
                line.reverse_video = reversed;
            }
        }
        self.dirty = true;
    }

    /// DECCOLM: 132/80 columns. The xterm profile asks the embedder for
    /// real geometry on the way back to 80; VT devices hard-code both.
    fn set_columns(&mut self, wide: bool) {
        let width = if wide {
            132
        } else if self.device_type == DeviceType::Xterm {
            self.listener.preferred_columns().unwrap_or(80)
        } else {
            80
        };
        self.modes.columns_132 = wide;
        let height = self.screen.height();
        self.screen.resize(width, height);
        self.tabs.reset(width);
        self.erase_display(2, false);
        self.current.cursor_x = 0;
        self.current.cursor_y = 0;
        self.wrap_line_flag = false;
        self.dirty = true;
    }

    fn set_line_shape(&mut self, double_width: bool, double_height: DoubleHeight) {
        if let Some(line) = self.screen.line_mut(self.current.cursor_y) {
            line.double_width = double_width;
            line.double_height = double_height;
        }
        self.current.cursor_x = self.current.cursor_x.min(self.right_margin());
        self.dirty = true;
    }

    fn save_cursor(&mut self) {
        self.saved = self.current;
    }

    fn restore_cursor(&mut self) {
        self.current = self.saved;
        self.current.cursor_x = self.current.cursor_x.min(self.screen.width() - 1);
        self.current.cursor_y = self.current.cursor_y.min(self.screen.height() - 1);
        self.wrap_line_flag = false;
    }

    fn full_reset(&mut self) {
        self.scanner.reset();
        self.scanner.set_vt52_mode(false);
        self.modes = TerminalModes::default();
        self.current = SavedState::default();
        self.saved = SavedState::default();
        self.tabs = TabStops::with_default_stops(self.screen.width());
        self.reset_palette();
        self.sixel_palette = default_sixel_palette();
        self.wrap_line_flag = false;
        self.cursor_style = 1;
        self.screen.reset_scroll_region();
        self.erase_display(2, false);
        self.dirty = true;
    }

    /// DECSTR: modes and attributes back to defaults, display retained.
    fn soft_reset(&mut self) {
        self.modes.cursor_visible = Dectcem::Show;
        self.modes.insert = Irm::Replace;
        self.modes.keypad = KeypadMode::Numeric;
        self.modes.cursor_keys = Decckm::Ansi;
        self.current.origin_mode = false;
        self.current.line_wrap = true;
        self.current.attributes.reset();
        self.current.charsets = decterm_common::charsets::CharsetState::default();
        self.screen.reset_scroll_region();
        self.wrap_line_flag = false;
    }

    fn reset_palette(&mut self) {
        for idx in 0..=255_u8 {
            self.palette.set(idx, self.backend.palette_rgb(idx));
        }
    }

    // ------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------

    fn respond(&self, data: Vec<u8>) {
        if let Err(err) = self.write_tx.send(data) {
            warn!("response dropped; writer gone: {err}");
        }
    }

    const fn csi_intro(&self) -> &'static [u8] {
        if self.modes.s8c1t { b"\x9b" } else { b"\x1b[" }
    }

    const fn dcs_intro(&self) -> &'static [u8] {
        if self.modes.s8c1t { b"\x90" } else { b"\x1bP" }
    }

    const fn osc_intro(&self) -> &'static [u8] {
        if self.modes.s8c1t { b"\x9d" } else { b"\x1b]" }
    }

    const fn st_outro(&self) -> &'static [u8] {
        if self.modes.s8c1t { b"\x9c" } else { b"\x1b\\" }
    }

    fn respond_csi(&self, tail: &str) {
        let mut data = self.csi_intro().to_vec();
        data.extend_from_slice(tail.as_bytes());
        self.respond(data);
    }

    fn respond_dcs(&self, body: &str) {
        let mut data = self.dcs_intro().to_vec();
        data.extend_from_slice(body.as_bytes());
        data.extend_from_slice(self.st_outro());
        self.respond(data);
    }

    fn respond_osc(&self, body: &str) {
        let mut data = self.osc_intro().to_vec();
        data.extend_from_slice(body.as_bytes());
        data.extend_from_slice(self.st_outro());
        self.respond(data);
    }

    fn report_device_attributes(&self) {
        if self.scanner.is_vt52_mode() {
            self.respond(b"\x1b/Z".to_vec());
            return;
        }
        let tail = match self.device_type {
            DeviceType::Vt100 => "?1;2c",
            DeviceType::Vt102 => "?6c",
            DeviceType::Vt220 | DeviceType::Xterm => "?62;1;6;9;4;22c",
        };
        self.respond_csi(tail);
    }

    fn report_secondary_attributes(&self) {
        let tail = match self.device_type {
            DeviceType::Vt100 | DeviceType::Vt102 => return,
            DeviceType::Vt220 => ">1;10;0c",
            DeviceType::Xterm => ">41;380;0c",
        };
        self.respond_csi(tail);
    }

    fn report_tertiary_attributes(&self) {
        if self.device_type.is_vt10x() {
            return;
        }
        self.respond_dcs("!|00000000");
    }

    fn report_device_status(&self, private: bool, param: u16) {
        match (private, param) {
            (false, 5) => self.respond_csi("0n"),
            (false, 6) => {
                let row = if self.current.origin_mode {
                    self.current.cursor_y - self.screen.scroll_region_top + 1
                } else {
                    self.current.cursor_y + 1
                };
                let col = self.current.cursor_x + 1;
                self.respond_csi(&format!("{row};{col}R"));
            }
            (true, 15) => self.respond_csi("?13n"),
            (true, 25) => self.respond_csi("?21n"),
            (p, other) => debug!("DSR {}{other} unsupported", if p { "?" } else { "" }),
        }
    }

    fn report_terminal_parameters(&self, param: u16) {
        // no parity, 8 bits, 38400 baud both directions
        let sol = param + 2;
        self.respond_csi(&format!("{sol};1;1;128;128;1;0x"));
    }

    fn report_xt_version(&self) {
        self.respond_dcs(&format!(">|decterm({})", env!("CARGO_PKG_VERSION")));
    }

    fn report_termcaps(&self, names: &[String]) {
        for name in names {
            let (ok, body) = dcs::xtgettcap_reply_body(name);
            if ok {
                self.respond_dcs(&format!("1+r{body}"));
            } else {
                self.respond_dcs("0+r");
            }
        }
    }

    fn report_palette_entry(&self, idx: u8) {
        let spec = self.palette.get(idx).to_x11_spec();
        self.respond_osc(&format!("4;{idx};{spec}"));
    }

    #[allow(clippy::too_many_lines)]
    fn report_mode(&self, private: bool, param: u16) {
        if private {
            let report = match param {
                1 => self.modes.cursor_keys.report(),
                2 => format!(
                    "\x1b[?2;{}$y",
                    if self.scanner.is_vt52_mode() { 2 } else { 1 }
                ),
                3 => format!("\x1b[?3;{}$y", if self.modes.columns_132 { 1 } else { 2 }),
                4 => format!("\x1b[?4;{}$y", if self.modes.smooth_scroll { 1 } else { 2 }),
                5 => self.modes.reverse_screen.report(),
                6 => format!("\x1b[?6;{}$y", if self.current.origin_mode { 1 } else { 2 }),
                7 => format!("\x1b[?7;{}$y", if self.current.line_wrap { 1 } else { 2 }),
                25 => self.modes.cursor_visible.report(),
                80 => self.modes.sixel_scrolling_disabled.report(),
                9 | 1000 | 1002 | 1003 => {
                    let active = self.modes.mouse_protocol.mode_number() == param;
                    format!("\x1b[?{param};{}$y", if active { 1 } else { 2 })
                }
                1005 | 1006 | 1016 => {
                    let active = match param {
                        1005 => self.modes.mouse_encoding == MouseEncoding::Utf8,
                        1006 => self.modes.mouse_encoding == MouseEncoding::Sgr,
                        _ => self.modes.mouse_encoding == MouseEncoding::SgrPixels,
                    };
                    format!("\x1b[?{param};{}$y", if active { 1 } else { 2 })
                }
                1070 => format!(
                    "\x1b[?1070;{}$y",
                    if self.modes.shared_sixel_palette { 1 } else { 2 }
                ),
                2026 => self.modes.synchronized_updates.report(),
                other => format!("\x1b[?{other};0$y"),
            };
            self.respond_report(&report);
        } else {
            let report = match param {
                4 => self.modes.insert.report(),
                20 => self.modes.new_line.report(),
                other => format!("\x1b[{other};0$y"),
            };
            self.respond_report(&report);
        }
    }

    /// Mode reports are produced as 7-bit strings; swap the introducer
    /// when S8C1T is in force.
    fn respond_report(&self, report: &str) {
        if self.modes.s8c1t {
            let mut data = vec![0x9B];
            data.extend_from_slice(report.trim_start_matches("\x1b[").as_bytes());
            self.respond(data);
        } else {
            self.respond(report.as_bytes().to_vec());
        }
    }

    // ------------------------------------------------------------------
    // Images
    // ------------------------------------------------------------------

    fn decode_sixel(&mut self, params: &[u16], data: &[u8]) {
        if !self.device_type.supports_sixel() {
            debug!("sixel ignored on {}", self.device_type);
            return;
        }
        let background = self.backend.default_background();
        let bitmap = if self.modes.shared_sixel_palette {
            SixelDecoder::new(&mut self.sixel_palette, params, background, true).decode(data)
        } else {
            let mut private = default_sixel_palette();
            SixelDecoder::new(&mut private, params, background, true).decode(data)
        };
        let Some(bitmap) = bitmap else {
            warn!("sixel image discarded");
            return;
        };
        if self.modes.sixel_scrolling_disabled.scrolling_enabled() {
            self.composite_image(&bitmap, true, true);
        } else {
            // DECSDM set: render from the home position, cursor parked
            let (save_x, save_y) = (self.current.cursor_x, self.current.cursor_y);
            self.current.cursor_x = 0;
            self.current.cursor_y = 0;
            self.composite_image(&bitmap, false, false);
            self.current.cursor_x = save_x;
            self.current.cursor_y = save_y;
        }
    }

    fn place_jexer_image(&mut self, image: JexerImage) {
        self.composite_image(&image.bitmap, image.scroll, image.scroll);
    }

    fn place_inline_image(&mut self, image: InlineImage) {
        let bitmap = self.scale_inline_image(&image);
        self.composite_image(&bitmap, true, image.move_cursor);
    }

    fn extent_pixels(extent: ImageExtent, cell_px: usize, screen_px: usize) -> Option<usize> {
        match extent {
            ImageExtent::Auto => None,
            ImageExtent::Cells(n) => {
                Some(usize::try_from(n).unwrap_or(usize::MAX).saturating_mul(cell_px))
            }
            ImageExtent::Pixels(n) => Some(usize::try_from(n).unwrap_or(usize::MAX)),
            ImageExtent::Percent(p) => {
                Some(screen_px * usize::try_from(p.min(100)).unwrap_or(100) / 100)
            }
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn scale_inline_image(&self, image: &InlineImage) -> RgbaImage {
        let screen_w = self.screen.width() * self.text_width;
        let screen_h = self.screen.height() * self.text_height;
        let want_w = Self::extent_pixels(image.width, self.text_width, screen_w);
        let want_h = Self::extent_pixels(image.height, self.text_height, screen_h);

        let (src_w, src_h) = image.bitmap.dimensions();
        let (mut w, mut h) = match (want_w, want_h) {
            (None, None) => return image.bitmap.clone(),
            (Some(w), None) => {
                let h = (u64::from(src_h) * w as u64 / u64::from(src_w.max(1))) as usize;
                (w, h.max(1))
            }
            (None, Some(h)) => {
                let w = (u64::from(src_w) * h as u64 / u64::from(src_h.max(1))) as usize;
                (w.max(1), h)
            }
            (Some(w), Some(h)) => (w, h),
        };
        if image.preserve_aspect && want_w.is_some() && want_h.is_some() {
            let scale_w = w as f64 / f64::from(src_w.max(1));
            let scale_h = h as f64 / f64::from(src_h.max(1));
            let scale = scale_w.min(scale_h);
            w = ((f64::from(src_w) * scale) as usize).max(1);
            h = ((f64::from(src_h) * scale) as usize).max(1);
        }
        w = w.clamp(1, MAX_JEXER_IMAGE_DIMENSION);
        h = h.clamp(1, MAX_JEXER_IMAGE_DIMENSION);
        image::imageops::resize(
            &image.bitmap,
            u32::try_from(w).unwrap_or(u32::MAX),
            u32::try_from(h).unwrap_or(u32::MAX),
            image::imageops::FilterType::Triangle,
        )
    }

    /// Carve a bitmap into cell-sized fragments anchored at the cursor.
    /// `scroll` lets the bottom of the image push the display up;
    /// `advance_cursor` leaves the cursor on the line below the image.
    fn composite_image(&mut self, bitmap: &RgbaImage, scroll: bool, advance_cursor: bool) {
        let cell_w = self.text_width.max(1);
        let cell_h = self.text_height.max(1);
        let cols = usize::try_from(bitmap.width()).unwrap_or(0).div_ceil(cell_w);
        let rows = usize::try_from(bitmap.height()).unwrap_or(0).div_ceil(cell_h);
        if cols == 0 || rows == 0 {
            return;
        }

        let shared = Arc::new(bitmap.clone());
        let start_col = self.current.cursor_x;
        let attrs = self.current.attributes;

        for r in 0..rows {
            let row = self.current.cursor_y;
            if let Some(line) = self.screen.line_mut(row) {
                for c in 0..cols {
                    let col = start_col + c;
                    if col >= line.length() {
                        break;
                    }
                    let mut cell = Cell::blank_with(attrs);
                    let slice = ImageSlice::new(
                        shared.clone(),
                        u32::try_from(c * cell_w).unwrap_or(u32::MAX),
                        u32::try_from(r * cell_h).unwrap_or(u32::MAX),
                    )
                    .with_role(WidthRole::Center);
                    cell.set_image(slice);
                    line.replace(col, cell);
                }
            }
            let last_row = r + 1 == rows;
            if !last_row {
                if scroll {
                    self.line_feed_scroll();
                } else if self.current.cursor_y + 1 < self.screen.height() {
                    self.current.cursor_y += 1;
                } else {
                    break;
                }
            }
        }

        if advance_cursor {
            self.line_feed_scroll();
            self.current.cursor_x = start_col;
        }
        self.wrap_line_flag = false;
        self.dirty = true;
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    fn take_snapshot(&self) -> DisplaySnapshot {
        DisplaySnapshot {
            lines: self.screen.snapshot(),
            cursor_x: self.current.cursor_x,
            cursor_y: self.current.cursor_y,
            cursor_visible: self.modes.cursor_visible.is_visible(),
            reverse_video: self.reverse_flag(),
            title: self.title.clone(),
        }
    }

    /// The display as the listener should see it. During a
    /// synchronized-update window a cached snapshot is served until it
    /// goes stale.
    pub fn visible_display(&mut self) -> DisplaySnapshot {
        let now = Instant::now();
        if self.modes.synchronized_updates.is_frozen() {
            if let Some((taken, snapshot)) = &self.last_snapshot {
                if now.duration_since(*taken) < SYNC_SNAPSHOT_MAX_AGE {
                    return snapshot.clone();
                }
            }
        }
        let snapshot = self.take_snapshot();
        self.last_snapshot = Some((now, snapshot.clone()));
        snapshot
    }

    /// Resolve a cell color for the embedder.
    #[must_use]
    pub fn resolve_color(&self, color: TerminalColor) -> Rgb {
        color.resolve(
            &self.palette,
            (
                self.backend.default_foreground(),
                self.backend.default_background(),
            ),
        )
    }

    /// Test seam: the visible text of one row, blanks as spaces.
    #[must_use]
    pub fn row_text(&self, row: usize) -> String {
        self.screen
            .line(row)
            .map(decterm_buffer::line::DisplayLine::text)
            .unwrap_or_default()
    }
}
