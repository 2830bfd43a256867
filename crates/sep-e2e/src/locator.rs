//! Locator strategies for finding elements.
//!
//! Page objects keep their locators as [`Selector`] values and resolve them
//! against the wrapper element on every call, so a re-render between two
//! calls never leaves a page object holding a cached child reference.

use std::fmt;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// XPath selector, evaluated relative to the search root
    XPath(String),
    /// Innermost elements whose text contains the value
    Text(String),
    /// CSS selector filtered by contained text (protractor `cssContainingText`)
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a CSS selector filtered by text content
    #[must_use]
    pub fn css_with_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CssWithText {
            css: css.into(),
            text: text.into(),
        }
    }

    /// Selector for the parent of the search root
    #[must_use]
    pub fn parent() -> Self {
        Self::XPath("..".to_string())
    }

    /// Selector for an element by id
    #[must_use]
    pub fn id(id: &str) -> Self {
        Self::Css(format!("#{id}"))
    }

    /// Selector for an element carrying an attribute with the given value
    #[must_use]
    pub fn attr(attribute: &str, value: &str) -> Self {
        Self::Css(format!("[{attribute}=\"{value}\"]"))
    }

    /// Convert to a JavaScript expression yielding an array of matching
    /// elements below `root` (a JS expression evaluating to a node).
    #[must_use]
    pub fn to_query(&self, root: &str) -> String {
        match self {
            Self::Css(s) => format!("Array.from({root}.querySelectorAll({s:?}))"),
            Self::XPath(s) => format!(
                "(function(r){{var it=document.evaluate({s:?},r,null,XPathResult.ORDERED_NODE_SNAPSHOT_TYPE,null);\
                 var out=[];for(var i=0;i<it.snapshotLength;i++){{out.push(it.snapshotItem(i));}}return out;}})({root})"
            ),
            Self::Text(t) => format!(
                "Array.from({root}.querySelectorAll('*')).filter(el => el.textContent.includes({t:?}) \
                 && !Array.from(el.children).some(c => c.textContent.includes({t:?})))"
            ),
            Self::CssWithText { css, text } => format!(
                "Array.from({root}.querySelectorAll({css:?})).filter(el => el.textContent.includes({text:?}))"
            ),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css={s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
            Self::Text(t) => write!(f, "text={t:?}"),
            Self::CssWithText { css, text } => write!(f, "css={css} containing {text:?}"),
        }
    }
}

impl From<&str> for Selector {
    fn from(css: &str) -> Self {
        Self::Css(css.to_string())
    }
}

impl From<String> for Selector {
    fn from(css: String) -> Self {
        Self::Css(css)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_selector() {
            let sel = Selector::css("button.primary");
            assert_eq!(sel, Selector::Css("button.primary".to_string()));
            assert_eq!(sel.to_string(), "css=button.primary");
        }

        #[test]
        fn test_id_and_attr_helpers() {
            assert_eq!(Selector::id("first"), Selector::css("#first"));
            assert_eq!(
                Selector::attr("data-value", "OT210027"),
                Selector::css("[data-value=\"OT210027\"]")
            );
        }

        #[test]
        fn test_from_str() {
            let sel: Selector = ".modal-dialog".into();
            assert_eq!(sel, Selector::css(".modal-dialog"));
        }

        #[test]
        fn test_parent_is_xpath() {
            assert_eq!(Selector::parent(), Selector::XPath("..".to_string()));
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_css_query_is_scoped() {
            let query = Selector::css("li").to_query("root");
            assert_eq!(query, "Array.from(root.querySelectorAll(\"li\"))");
        }

        #[test]
        fn test_text_query_filters_innermost() {
            let query = Selector::text("Any Object").to_query("document");
            assert!(query.contains("textContent.includes(\"Any Object\")"));
            assert!(query.contains("el.children"));
        }

        #[test]
        fn test_css_with_text_query() {
            let query = Selector::css_with_text("li", "Case").to_query("document");
            assert!(query.contains("querySelectorAll(\"li\")"));
            assert!(query.contains("includes(\"Case\")"));
        }

        #[test]
        fn test_xpath_query_uses_root_as_context() {
            let query = Selector::parent().to_query("el");
            assert!(query.contains("document.evaluate(\"..\",r"));
            assert!(query.ends_with("(el)"));
        }
    }
}
