//! Tailwind class sets for the booth, results and admin views.

pub const PAGE: &str = "container mx-auto px-4 sm:px-6 py-10 max-w-4xl mt-12";
pub const PAGE_NARROW: &str = "min-h-screen px-4 pt-16";
pub const PANEL: &str = "bg-gray-800 border border-gray-700 rounded-xl p-4 shadow-sm";
pub const DIALOG: &str = "bg-gray-800 border border-gray-700 rounded-xl shadow-xl p-6 w-full max-w-xl mx-auto";
pub const MODAL_BACKDROP: &str = "fixed inset-0 z-40 flex items-center justify-center bg-black/70 px-4";
pub const PARTY_TILE: &str = "bg-gray-800 border border-gray-700 border-t-4 rounded-xl shadow-md p-5 w-full text-left transition-transform duration-200 hover:-translate-y-1";
pub const SUCCESS_PANEL: &str = "text-center p-6 mb-6 bg-green-900/50 border border-green-600 rounded-xl";
pub const LOADING: &str = "flex justify-center p-8 text-sm text-gray-400 animate-pulse";

pub const TITLE: &str = "text-3xl font-extrabold mb-6 text-center text-white";
pub const SECTION_TITLE: &str = "text-2xl font-bold mb-4 text-gray-100";
pub const PARTY_NAME: &str = "text-xl font-semibold mb-1 text-gray-100 break-words";
pub const LABEL: &str = "block text-sm font-semibold text-gray-200";
pub const CAPTION: &str = "block text-xs uppercase tracking-wide opacity-80 mb-1";
pub const MUTED: &str = "text-sm text-gray-400";

pub const FIELD: &str = "flex-1 flex flex-col gap-2";
pub const INPUT: &str = "border border-gray-600 bg-gray-900 text-white rounded-lg w-full py-2 px-3 focus:outline-none focus:border-blue-500";

pub const ROW: &str = "flex justify-between items-center gap-3";
pub const STACK: &str = "space-y-3";
pub const STACK_LG: &str = "space-y-6";
pub const STATS_GRID: &str = "grid grid-cols-1 sm:grid-cols-2 gap-4";
pub const STAT_TOTAL: &str = "p-4 rounded-xl border bg-blue-900 border-blue-700 text-blue-100";
pub const STAT_LEADER: &str = "p-4 rounded-xl border bg-green-900 border-green-700 text-green-100";

pub const BAR_TRACK: &str = "w-full h-3 bg-gray-700 rounded-full overflow-hidden";
pub const BAR_FILL: &str = "h-full rounded-full transition-all duration-500 ease-out";

#[derive(Clone, Copy)]
pub enum ButtonKind {
    Primary,
    Secondary,
    Warning,
    Danger,
}

pub fn button(kind: ButtonKind) -> String {
    let color = match kind {
        ButtonKind::Primary => "bg-blue-600 hover:bg-blue-700",
        ButtonKind::Secondary => "bg-gray-600 hover:bg-gray-700",
        ButtonKind::Warning => "bg-yellow-600 hover:bg-yellow-700",
        ButtonKind::Danger => "bg-red-600 hover:bg-red-700",
    };
    combine_classes(
        "px-4 py-2 rounded-lg font-medium text-white transition-colors disabled:opacity-50 disabled:cursor-not-allowed",
        color,
    )
}

#[derive(Clone, Copy)]
pub enum Tone {
    Error,
    Success,
}

pub fn alert(tone: Tone) -> &'static str {
    match tone {
        Tone::Error => "p-4 mb-6 rounded-lg bg-red-500 text-white shadow-lg",
        Tone::Success => "p-4 mb-6 rounded-lg bg-green-500 text-white shadow-lg",
    }
}

pub fn combine_classes(base: &str, additional: &str) -> String {
    format!("{} {}", base, additional)
}
