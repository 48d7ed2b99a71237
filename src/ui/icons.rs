pub struct Icons;

impl Icons {
    pub const STORE: &str = "🏬";
    pub const SEARCH: &str = "🔍";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const NEW: &str = "✨";
    pub const DEL: &str = "🗑️";
    pub const SCREEN: &str = "🖥️";
    pub const TOOLBOX: &str = "🧰";
    pub const TICKET: &str = "🧾";
    pub const GEAR: &str = "⚙️";
}
