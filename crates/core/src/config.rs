//! Configuration model: every setting the trackball firmware exposes.
//!
//! Each function category is a closed enumeration with an explicit wire
//! code per variant. Ball and ring functions are signed: an inverted
//! variant is sent as the negated code of its plain counterpart. Button
//! functions are never negative.

use serde::{Deserialize, Serialize};

/// The only configuration layout version this crate speaks.
pub const CONFIG_VERSION: u8 = 1;

/// Number of physical buttons.
pub const BUTTON_COUNT: usize = 4;

/// Functions assignable to a trackball axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BallFunction {
    #[default]
    None,
    CursorX,
    CursorY,
    VScroll,
    HScroll,
    CursorXInverted,
    CursorYInverted,
    VScrollInverted,
    HScrollInverted,
}

impl BallFunction {
    /// All functions, in menu order.
    pub const ALL: &'static [BallFunction] = &[
        BallFunction::None,
        BallFunction::CursorX,
        BallFunction::CursorY,
        BallFunction::VScroll,
        BallFunction::HScroll,
        BallFunction::CursorXInverted,
        BallFunction::CursorYInverted,
        BallFunction::VScrollInverted,
        BallFunction::HScrollInverted,
    ];

    /// Look up a function from its wire code.
    pub fn from_wire(code: i8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::CursorX),
            2 => Some(Self::CursorY),
            3 => Some(Self::VScroll),
            4 => Some(Self::HScroll),
            -1 => Some(Self::CursorXInverted),
            -2 => Some(Self::CursorYInverted),
            -3 => Some(Self::VScrollInverted),
            -4 => Some(Self::HScrollInverted),
            _ => None,
        }
    }

    /// Wire code sent to the device.
    pub fn wire(self) -> i8 {
        match self {
            Self::None => 0,
            Self::CursorX => 1,
            Self::CursorY => 2,
            Self::VScroll => 3,
            Self::HScroll => 4,
            Self::CursorXInverted => -1,
            Self::CursorYInverted => -2,
            Self::VScrollInverted => -3,
            Self::HScrollInverted => -4,
        }
    }

    pub fn is_inverted(self) -> bool {
        self.wire() < 0
    }

    /// The same function with the opposite direction. `None` has no direction.
    pub fn inverted(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::CursorX => Self::CursorXInverted,
            Self::CursorY => Self::CursorYInverted,
            Self::VScroll => Self::VScrollInverted,
            Self::HScroll => Self::HScrollInverted,
            Self::CursorXInverted => Self::CursorX,
            Self::CursorYInverted => Self::CursorY,
            Self::VScrollInverted => Self::VScroll,
            Self::HScrollInverted => Self::HScroll,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::CursorX => "Cursor X",
            Self::CursorY => "Cursor Y",
            Self::VScroll => "V scroll",
            Self::HScroll => "H scroll",
            Self::CursorXInverted => "Cursor X (inverted)",
            Self::CursorYInverted => "Cursor Y (inverted)",
            Self::VScrollInverted => "V scroll (inverted)",
            Self::HScrollInverted => "H scroll (inverted)",
        }
    }

    /// CLI name, accepted back by [`BallFunction::from_name`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::CursorX => "cursor-x",
            Self::CursorY => "cursor-y",
            Self::VScroll => "v-scroll",
            Self::HScroll => "h-scroll",
            Self::CursorXInverted => "cursor-x-inverted",
            Self::CursorYInverted => "cursor-y-inverted",
            Self::VScrollInverted => "v-scroll-inverted",
            Self::HScrollInverted => "h-scroll-inverted",
        }
    }

    /// Parse a ball function from a CLI-friendly string (case-insensitive).
    ///
    /// Accepts the names returned by [`BallFunction::name`], underscores in
    /// place of dashes, and the `vscroll`/`hscroll` spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('_', "-").as_str() {
            "none" | "disabled" => Some(Self::None),
            "cursor-x" | "x" => Some(Self::CursorX),
            "cursor-y" | "y" => Some(Self::CursorY),
            "v-scroll" | "vscroll" => Some(Self::VScroll),
            "h-scroll" | "hscroll" => Some(Self::HScroll),
            "cursor-x-inverted" => Some(Self::CursorXInverted),
            "cursor-y-inverted" => Some(Self::CursorYInverted),
            "v-scroll-inverted" | "vscroll-inverted" => Some(Self::VScrollInverted),
            "h-scroll-inverted" | "hscroll-inverted" => Some(Self::HScrollInverted),
            _ => None,
        }
    }
}

impl std::fmt::Display for BallFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Functions assignable to the scroll ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RingFunction {
    #[default]
    None,
    VScroll,
    HScroll,
    VScrollInverted,
    HScrollInverted,
}

impl RingFunction {
    pub const ALL: &'static [RingFunction] = &[
        RingFunction::None,
        RingFunction::VScroll,
        RingFunction::HScroll,
        RingFunction::VScrollInverted,
        RingFunction::HScrollInverted,
    ];

    pub fn from_wire(code: i8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::VScroll),
            2 => Some(Self::HScroll),
            -1 => Some(Self::VScrollInverted),
            -2 => Some(Self::HScrollInverted),
            _ => None,
        }
    }

    pub fn wire(self) -> i8 {
        match self {
            Self::None => 0,
            Self::VScroll => 1,
            Self::HScroll => 2,
            Self::VScrollInverted => -1,
            Self::HScrollInverted => -2,
        }
    }

    pub fn is_inverted(self) -> bool {
        self.wire() < 0
    }

    pub fn inverted(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::VScroll => Self::VScrollInverted,
            Self::HScroll => Self::HScrollInverted,
            Self::VScrollInverted => Self::VScroll,
            Self::HScrollInverted => Self::HScroll,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::VScroll => "V scroll",
            Self::HScroll => "H scroll",
            Self::VScrollInverted => "V scroll (inverted)",
            Self::HScrollInverted => "H scroll (inverted)",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::VScroll => "v-scroll",
            Self::HScroll => "h-scroll",
            Self::VScrollInverted => "v-scroll-inverted",
            Self::HScrollInverted => "h-scroll-inverted",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('_', "-").as_str() {
            "none" | "disabled" => Some(Self::None),
            "v-scroll" | "vscroll" => Some(Self::VScroll),
            "h-scroll" | "hscroll" => Some(Self::HScroll),
            "v-scroll-inverted" | "vscroll-inverted" => Some(Self::VScrollInverted),
            "h-scroll-inverted" | "hscroll-inverted" => Some(Self::HScrollInverted),
            _ => None,
        }
    }
}

impl std::fmt::Display for RingFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Functions assignable to a physical button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ButtonFunction {
    #[default]
    None,
    Button1,
    Button2,
    Button3,
    Button4,
    Button5,
    Button6,
    Button7,
    Button8,
    ClickDrag,
    Shift,
}

impl ButtonFunction {
    pub const ALL: &'static [ButtonFunction] = &[
        ButtonFunction::None,
        ButtonFunction::Button1,
        ButtonFunction::Button2,
        ButtonFunction::Button3,
        ButtonFunction::Button4,
        ButtonFunction::Button5,
        ButtonFunction::Button6,
        ButtonFunction::Button7,
        ButtonFunction::Button8,
        ButtonFunction::ClickDrag,
        ButtonFunction::Shift,
    ];

    /// Look up a button function from its wire code (0..=10).
    pub fn from_wire(code: i8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Button1),
            2 => Some(Self::Button2),
            3 => Some(Self::Button3),
            4 => Some(Self::Button4),
            5 => Some(Self::Button5),
            6 => Some(Self::Button6),
            7 => Some(Self::Button7),
            8 => Some(Self::Button8),
            9 => Some(Self::ClickDrag),
            10 => Some(Self::Shift),
            _ => None,
        }
    }

    pub fn wire(self) -> i8 {
        match self {
            Self::None => 0,
            Self::Button1 => 1,
            Self::Button2 => 2,
            Self::Button3 => 3,
            Self::Button4 => 4,
            Self::Button5 => 5,
            Self::Button6 => 6,
            Self::Button7 => 7,
            Self::Button8 => 8,
            Self::ClickDrag => 9,
            Self::Shift => 10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Button1 => "Button 1 (left)",
            Self::Button2 => "Button 2 (right)",
            Self::Button3 => "Button 3 (middle)",
            Self::Button4 => "Button 4 (back)",
            Self::Button5 => "Button 5 (forward)",
            Self::Button6 => "Button 6",
            Self::Button7 => "Button 7",
            Self::Button8 => "Button 8",
            Self::ClickDrag => "Click-drag",
            Self::Shift => "Shift",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Button1 => "left",
            Self::Button2 => "right",
            Self::Button3 => "middle",
            Self::Button4 => "back",
            Self::Button5 => "forward",
            Self::Button6 => "button6",
            Self::Button7 => "button7",
            Self::Button8 => "button8",
            Self::ClickDrag => "click-drag",
            Self::Shift => "shift",
        }
    }

    /// Parse a button function from a CLI-friendly string (case-insensitive).
    ///
    /// - "left", "button1" → Button1
    /// - "right", "button2" → Button2
    /// - "middle", "button3" → Button3
    /// - "back", "button4" → Button4
    /// - "forward", "button5" → Button5
    /// - "button6".."button8"
    /// - "click-drag", "drag" → ClickDrag
    /// - "shift" → Shift
    /// - "none", "disabled" → None
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('_', "-").as_str() {
            "none" | "disabled" => Some(Self::None),
            "left" | "button1" => Some(Self::Button1),
            "right" | "button2" => Some(Self::Button2),
            "middle" | "button3" => Some(Self::Button3),
            "back" | "button4" => Some(Self::Button4),
            "forward" | "button5" => Some(Self::Button5),
            "button6" => Some(Self::Button6),
            "button7" => Some(Self::Button7),
            "button8" => Some(Self::Button8),
            "click-drag" | "clickdrag" | "drag" => Some(Self::ClickDrag),
            "shift" => Some(Self::Shift),
            _ => None,
        }
    }
}

impl std::fmt::Display for ButtonFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Complete trackball configuration.
///
/// A plain value: load one from the device, edit the fields, and save it
/// back. Range checks on the CPI fields happen in the codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub version: u8,
    pub ball_axis_x: BallFunction,
    pub ball_axis_y: BallFunction,
    pub ball_axis_x_shifted: BallFunction,
    pub ball_axis_y_shifted: BallFunction,
    /// Sensor resolution in hundreds of CPI (1..=120).
    pub ball_cpi: u8,
    pub ball_cpi_shifted: u8,
    pub ring: RingFunction,
    pub ring_shifted: RingFunction,
    /// Buttons 1..4, unshifted layer.
    pub buttons: [ButtonFunction; BUTTON_COUNT],
    /// Buttons 1..4 while a Shift button is held.
    pub buttons_shifted: [ButtonFunction; BUTTON_COUNT],
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ball_axis_x: BallFunction::None,
            ball_axis_y: BallFunction::None,
            ball_axis_x_shifted: BallFunction::None,
            ball_axis_y_shifted: BallFunction::None,
            ball_cpi: crate::safety::CPI_MIN,
            ball_cpi_shifted: crate::safety::CPI_MIN,
            ring: RingFunction::None,
            ring_shifted: RingFunction::None,
            buttons: [ButtonFunction::None; BUTTON_COUNT],
            buttons_shifted: [ButtonFunction::None; BUTTON_COUNT],
        }
    }
}

/// Field names for the unshifted buttons, as reported in errors.
pub const BUTTON_FIELDS: [&str; BUTTON_COUNT] = ["button1", "button2", "button3", "button4"];

/// Field names for the shifted buttons.
pub const BUTTON_SHIFTED_FIELDS: [&str; BUTTON_COUNT] = [
    "button1_shifted",
    "button2_shifted",
    "button3_shifted",
    "button4_shifted",
];

/// Effective sensor resolution for a stored CPI value.
pub fn cpi_to_dpi(cpi: u8) -> u32 {
    cpi as u32 * 100
}
