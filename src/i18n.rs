// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库，词条位于 locales/*.yml
// 用途: 行被拒原因 / 批次错误的对外描述
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["zh-CN", "en"];

/// 语言环境变量
pub const LOCALE_ENV: &str = "FLEET_IMPORT_LOCALE";

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// 不支持的语言代码被忽略，返回 false
pub fn set_locale(locale: &str) -> bool {
    if !SUPPORTED_LOCALES.contains(&locale) {
        return false;
    }
    rust_i18n::set_locale(locale);
    true
}

/// 按环境变量 FLEET_IMPORT_LOCALE 设置语言（未设置时保持默认 zh-CN）
pub fn init_from_env() {
    if let Ok(locale) = std::env::var(LOCALE_ENV) {
        if !set_locale(locale.trim()) {
            tracing::warn!(locale = %locale, "不支持的语言代码，保持默认语言");
        }
    }
}

/// 翻译消息（无参数）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数，占位符形如 %{name}）
///
/// # 示例
/// ```no_run
/// use fleet_ops_import::i18n::t_with_args;
/// let msg = t_with_args("reject.duplicate_count", &[("count", "7")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
