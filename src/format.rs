//! Category-specific answer formatting and tool descriptors.
//!
//! Math answers get LaTeX delimiters so the client can render them with
//! MathJax; programming answers get normalized code fences and inline code
//! markup. Other categories pass through untouched.

use std::sync::LazyLock;

use regex::Regex;

use crate::ai::{ENGLISH_CATEGORY, MATH_CATEGORY, PROGRAMMING_CATEGORY, SCIENCE_CATEGORY};

// x**2 style exponents
static EXPONENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\*\*(\w+)").expect("hardcoded pattern"));

static MATH_EXPRESSION_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"([a-zA-Z]\s*[+\-*/=]\s*[a-zA-Z0-9]+)").expect("hardcoded pattern"),
        Regex::new(r"([0-9]+\s*[+\-*/=]\s*[0-9]+)").expect("hardcoded pattern"),
        Regex::new(r"(∫|∑|∏|√|∞|π|α|β|γ|δ|θ|λ|μ|σ|φ|ψ|ω)").expect("hardcoded pattern"),
    ]
});

static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(\w+)?\n(.*?)\n```").expect("hardcoded pattern"));

static INLINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("hardcoded pattern"));

/// Wrap mathematical expressions in `$...$` delimiters for MathJax.
pub fn format_math_answer(answer: &str) -> String {
    let mut formatted = EXPONENT_RE
        .replace_all(answer, "$$${1}^{${2}}$$")
        .into_owned();

    for re in MATH_EXPRESSION_RES.iter() {
        formatted = re.replace_all(&formatted, "$$${1}$$").into_owned();
    }

    formatted
}

/// Normalize code fences (defaulting the language) and mark up inline code.
pub fn format_code_answer(answer: &str, default_language: &str) -> String {
    let formatted = CODE_FENCE_RE
        .replace_all(answer, |caps: &regex::Captures| {
            let lang = caps
                .get(1)
                .map(|m| m.as_str())
                .unwrap_or(default_language);
            format!("```{}\n{}\n```", lang, &caps[2])
        })
        .into_owned();

    // Single-line inline code only, so fence lines are left alone
    INLINE_CODE_RE
        .replace_all(&formatted, "<code>${1}</code>")
        .into_owned()
}

/// Specialized client-side tools available per category.
pub fn category_tools(category: &str) -> serde_json::Value {
    match category {
        MATH_CATEGORY => serde_json::json!({
            "mathjax": true,
            "calculator": true,
            "graph_plotting": true,
            "formula_templates": [
                "이차방정식: $ax^2 + bx + c = 0$",
                "피타고라스 정리: $a^2 + b^2 = c^2$",
                "미분: $\\frac{d}{dx}f(x)$",
                "적분: $\\int f(x)dx$"
            ]
        }),
        SCIENCE_CATEGORY => serde_json::json!({
            "unit_converter": true,
            "periodic_table": true,
            "formula_templates": [
                "속도: $v = \\frac{d}{t}$",
                "운동에너지: $E_k = \\frac{1}{2}mv^2$",
                "이상기체: $PV = nRT$"
            ]
        }),
        PROGRAMMING_CATEGORY => serde_json::json!({
            "code_editor": true,
            "syntax_highlighting": true,
            "code_templates": [
                "Python 함수",
                "JavaScript 함수",
                "HTML 템플릿",
                "SQL 쿼리"
            ]
        }),
        ENGLISH_CATEGORY => serde_json::json!({
            "dictionary": true,
            "grammar_checker": true,
            "translation": true
        }),
        _ => serde_json::json!({}),
    }
}
