//! Advanced search: object types plus a nested tree of criteria.
//!
//! The sandbox stub mirrors the criteria into a `#tree-model` textarea as
//! JSON, which [`AdvancedSearchStub::tree_model`] reads back as a
//! [`SearchTree`].

use crate::components::MultiSelectMenu;
use crate::components::SingleSelectMenu;
use crate::driver::Session;
use crate::locator::Selector;
use crate::page_object::{impl_page_object, PageObject, PageRegion};
use crate::result::{E2eError, E2eResult};
use crate::wait::Condition;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Route of the advanced search sandbox
pub const ADVANCED_SEARCH_URL: &str = "/sandbox/search/components/advanced";

/// Value of the catch-all object type
pub const ANY_OBJECT_TYPE: &str = "anyObject";
/// Deepest level a criteria group can be nested at
pub const MAX_CRITERIA_DEPTH: usize = 3;
/// Property of a freshly added rule
pub const DEFAULT_PROPERTY: &str = "title";
/// Operator of a freshly added rule
pub const DEFAULT_OPERATOR: &str = "contains";

// =============================================================================
// TREE MODEL
// =============================================================================

/// How the members of a group combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Junction {
    /// Every member matches
    #[default]
    #[serde(rename = "AND")]
    And,
    /// Any member matches
    #[serde(rename = "OR")]
    Or,
}

impl Junction {
    /// Wire name, `AND` or `OR`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Single `property operator value` condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaRule {
    /// Rule id
    pub id: String,
    /// Property the rule tests
    pub field: String,
    /// Comparison operator
    pub operator: String,
    /// Compared value, empty matches everything
    #[serde(default)]
    pub value: String,
}

impl CriteriaRule {
    /// `title contains ""`
    #[must_use]
    pub fn default_rule(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field: DEFAULT_PROPERTY.to_string(),
            operator: DEFAULT_OPERATOR.to_string(),
            value: String::new(),
        }
    }
}

/// Member of a criteria group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriteriaNode {
    /// Nested group
    Group(CriteriaGroup),
    /// Leaf rule
    Rule(CriteriaRule),
}

/// Rules and nested groups joined by one [`Junction`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaGroup {
    /// Group id
    pub id: String,
    /// How the members combine
    pub condition: Junction,
    /// Members in display order
    pub rules: Vec<CriteriaNode>,
}

impl CriteriaGroup {
    /// Rules directly in this group
    pub fn own_rules(&self) -> impl Iterator<Item = &CriteriaRule> {
        self.rules.iter().filter_map(|node| match node {
            CriteriaNode::Rule(rule) => Some(rule),
            CriteriaNode::Group(_) => None,
        })
    }

    /// Groups directly in this group
    pub fn subgroups(&self) -> impl Iterator<Item = &CriteriaGroup> {
        self.rules.iter().filter_map(|node| match node {
            CriteriaNode::Group(group) => Some(group),
            CriteriaNode::Rule(_) => None,
        })
    }

    /// Rules of the whole subtree
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.own_rules().count() + self.subgroups().map(Self::rule_count).sum::<usize>()
    }

    /// Levels in the subtree, 1 for a group without subgroups
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.subgroups().map(Self::depth).max().unwrap_or_default()
    }
}

/// Object types plus criteria, as mirrored by the sandbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTree {
    /// Selected object type values
    pub types: Vec<String>,
    /// Root criteria group
    pub criteria: CriteriaGroup,
}

// =============================================================================
// STUB
// =============================================================================

/// Sandbox controls around the advanced search
#[derive(Debug, Clone)]
pub struct AdvancedSearchStub {
    region: PageRegion,
}

impl_page_object!(AdvancedSearchStub, "AdvancedSearchStub", |page| {
    let _ = page.region.visible_child(".seip-advanced-search").await?;
    Ok(())
});

impl AdvancedSearchStub {
    /// Wait for the stub in the document
    pub async fn wait_for(session: &Session) -> E2eResult<Self> {
        Self::locate(session, Selector::css(".advanced-search-stub")).await
    }

    async fn press(&self, id: &str) -> E2eResult<()> {
        self.region.find(Selector::id(id)).await?.click().await
    }

    /// Replace the criteria with an empty root group
    pub async fn load_empty_criteria(&self) -> E2eResult<()> {
        self.press("empty_criteria").await
    }

    /// Replace the criteria with the predefined document search
    pub async fn load_predefined_criteria(&self) -> E2eResult<()> {
        self.press("predefined_criteria").await
    }

    /// Enable or disable the whole form
    pub async fn toggle_disabled(&self) -> E2eResult<()> {
        self.press("toggle_disabled").await
    }

    /// Lock or unlock the object type selection
    pub async fn toggle_lock(&self) -> E2eResult<()> {
        self.press("toggle_lock").await
    }

    /// Current tree model
    pub async fn tree_model(&self) -> E2eResult<SearchTree> {
        let json = self.region.find(Selector::id("tree-model")).await?.value().await?;
        Ok(serde_json::from_str(&json)?)
    }

    /// The advanced search form
    pub async fn advanced_search(&self) -> E2eResult<AdvancedSearch> {
        AdvancedSearch::locate_within(self.element(), Selector::css(".seip-advanced-search")).await
    }
}

// =============================================================================
// FORM
// =============================================================================

/// Advanced search form with sections and toolbar
#[derive(Debug, Clone)]
pub struct AdvancedSearch {
    region: PageRegion,
}

impl_page_object!(AdvancedSearch, "AdvancedSearch", |page| {
    let _ = page.region.visible_child(".advanced-search-section").await?;
    Ok(())
});

impl AdvancedSearch {
    /// Section at a 0-based position
    pub async fn section(&self, index: usize) -> E2eResult<AdvancedSearchSection> {
        AdvancedSearchSection::locate_within(
            self.element(),
            Selector::css(format!(".advanced-search-section:nth-child({})", index + 1)),
        )
        .await
    }

    /// Run the search and return the number of results
    pub async fn search(&self) -> E2eResult<usize> {
        info!("advanced search");
        self.region.find(".seip-search").await?.click().await?;
        let count = self.region.visible_child(".advanced-search-results .results-count").await?;
        let text = count.text().await?;
        Ok(text
            .split_whitespace()
            .next()
            .and_then(|n| n.parse().ok())
            .unwrap_or_default())
    }

    /// Reset types and criteria to their defaults
    pub async fn clear(&self) -> E2eResult<()> {
        self.region.find(".clear-criteria").await?.click().await
    }

    /// Whether the search button is disabled
    pub async fn is_disabled(&self) -> E2eResult<bool> {
        Ok(!self.region.find(".seip-search").await?.is_enabled().await?)
    }
}

/// Object type select plus the root criteria group
#[derive(Debug, Clone)]
pub struct AdvancedSearchSection {
    region: PageRegion,
}

impl_page_object!(AdvancedSearchSection, "AdvancedSearchSection", |page| {
    let _ = page.region.visible_child(".object-type-select").await?;
    Ok(())
});

impl AdvancedSearchSection {
    /// Object type multi select
    pub async fn object_type_select(&self) -> E2eResult<MultiSelectMenu> {
        MultiSelectMenu::locate_within(
            self.element(),
            Selector::css(".object-type-select .select2-field"),
        )
        .await
    }

    /// Selected object type values
    pub async fn selected_types(&self) -> E2eResult<Vec<String>> {
        self.object_type_select().await?.selected_values().await
    }

    /// Whether the object type selection is locked
    pub async fn is_type_locked(&self) -> E2eResult<bool> {
        self.region.find(".object-type-select").await?.has_class("locked").await
    }

    /// Root criteria group
    pub async fn criteria(&self) -> E2eResult<AdvancedSearchGroup> {
        AdvancedSearchGroup::locate_within(self.element(), Selector::css(".criteria-level-1")).await
    }
}

// =============================================================================
// CRITERIA
// =============================================================================

/// One criteria group; rows and subgroups point back through `data-group`
#[derive(Debug, Clone)]
pub struct AdvancedSearchGroup {
    region: PageRegion,
}

impl_page_object!(AdvancedSearchGroup, "AdvancedSearchGroup", |page| {
    let _ = page.region.present_child(".criteria-controls").await?;
    Ok(())
});

impl AdvancedSearchGroup {
    async fn id(&self) -> E2eResult<String> {
        Ok(self.element().attribute("data-id").await?.unwrap_or_default())
    }

    /// Nesting level, 1 for the root group
    pub async fn level(&self) -> E2eResult<usize> {
        Ok(self
            .element()
            .attribute("data-level")
            .await?
            .and_then(|level| level.parse().ok())
            .unwrap_or(1))
    }

    /// AND/OR switch and the add/remove buttons
    pub async fn controls(&self) -> E2eResult<AdvancedSearchControls> {
        let id = self.id().await?;
        AdvancedSearchControls::locate_within(
            self.element(),
            Selector::css(format!(".criteria-controls[data-group=\"{id}\"]")),
        )
        .await
    }

    /// Rows directly in this group
    pub async fn rows(&self) -> E2eResult<Vec<AdvancedSearchRow>> {
        let id = self.id().await?;
        let mut out = Vec::new();
        for row in self
            .region
            .find_all(format!(".criteria-row[data-group=\"{id}\"]"))
            .await?
        {
            out.push(AdvancedSearchRow::bind(Some(row)).await?);
        }
        Ok(out)
    }

    /// Row at a 0-based position
    pub async fn row(&self, index: usize) -> E2eResult<AdvancedSearchRow> {
        self.rows()
            .await?
            .into_iter()
            .nth(index)
            .ok_or_else(|| E2eError::NoSuchElement {
                selector: format!("criteria row {index}"),
            })
    }

    /// Groups nested directly in this group
    pub async fn groups(&self) -> E2eResult<Vec<AdvancedSearchGroup>> {
        let id = self.id().await?;
        let mut out = Vec::new();
        for group in self
            .region
            .find_all(format!(".criteria-group[data-parent=\"{id}\"]"))
            .await?
        {
            out.push(Self::bind(Some(group)).await?);
        }
        Ok(out)
    }

    /// Nested group at a 0-based position
    pub async fn group(&self, index: usize) -> E2eResult<AdvancedSearchGroup> {
        self.groups()
            .await?
            .into_iter()
            .nth(index)
            .ok_or_else(|| E2eError::NoSuchElement {
                selector: format!("criteria group {index}"),
            })
    }

    /// Wait until the group holds exactly `count` rows
    pub async fn wait_for_rows(&self, count: usize) -> E2eResult<()> {
        let _ = self
            .region
            .waiter()
            .until_fn(&format!("{count} criteria rows"), || async move {
                Ok(self.rows().await?.len() == count)
            })
            .await?;
        Ok(())
    }
}

/// Controls of one group (`.criteria-controls`)
#[derive(Debug, Clone)]
pub struct AdvancedSearchControls {
    region: PageRegion,
}

impl_page_object!(AdvancedSearchControls, "AdvancedSearchControls", |page| page
    .region
    .wait_until_present()
    .await);

impl AdvancedSearchControls {
    async fn press(&self, class: &str) -> E2eResult<()> {
        let button = self.region.find(class).await?;
        let _ = self.region.wait_for(Condition::clickable(&button)).await?;
        button.click().await
    }

    /// Join the group with AND
    pub async fn and(&self) -> E2eResult<()> {
        self.press(".criteria-and").await
    }

    /// Join the group with OR
    pub async fn or(&self) -> E2eResult<()> {
        self.press(".criteria-or").await
    }

    /// Whether AND is the selected junction
    pub async fn is_and_selected(&self) -> E2eResult<bool> {
        self.region.find(".criteria-and").await?.has_class("active").await
    }

    /// Whether OR is the selected junction
    pub async fn is_or_selected(&self) -> E2eResult<bool> {
        self.region.find(".criteria-or").await?.has_class("active").await
    }

    /// Append a default rule
    pub async fn add_rule(&self) -> E2eResult<()> {
        self.press(".add-rule").await
    }

    /// Append a nested group holding a default rule
    pub async fn add_group(&self) -> E2eResult<()> {
        self.press(".add-rules").await
    }

    /// Whether another level of nesting is offered
    pub async fn can_add_group(&self) -> E2eResult<bool> {
        self.region.has(".add-rules").await
    }

    /// Remove the whole group
    pub async fn remove_group(&self) -> E2eResult<()> {
        self.press(".remove-rules").await
    }

    /// Whether the group can be removed
    pub async fn can_remove_group(&self) -> E2eResult<bool> {
        self.region.has(".remove-rules").await
    }
}

/// One `property operator value` row
#[derive(Debug, Clone)]
pub struct AdvancedSearchRow {
    region: PageRegion,
}

impl_page_object!(AdvancedSearchRow, "AdvancedSearchRow", |page| {
    let _ = page.region.present_child(".criteria-property .select2-field").await?;
    Ok(())
});

impl AdvancedSearchRow {
    /// Property select
    pub async fn property_select(&self) -> E2eResult<SingleSelectMenu> {
        SingleSelectMenu::locate_within(
            self.element(),
            Selector::css(".criteria-property .select2-field"),
        )
        .await
    }

    /// Operator select
    pub async fn operator_select(&self) -> E2eResult<SingleSelectMenu> {
        SingleSelectMenu::locate_within(
            self.element(),
            Selector::css(".criteria-operator .select2-field"),
        )
        .await
    }

    /// Selected property value
    pub async fn property(&self) -> E2eResult<Option<String>> {
        self.property_select().await?.selected_value().await
    }

    /// Selected operator value
    pub async fn operator(&self) -> E2eResult<Option<String>> {
        self.operator_select().await?.selected_value().await
    }

    /// Property values offered by the row
    pub async fn available_properties(&self) -> E2eResult<Vec<String>> {
        self.property_select().await?.menu_values().await
    }

    /// Compared value
    pub async fn value(&self) -> E2eResult<String> {
        self.region.find(".criteria-value input").await?.value().await
    }

    /// Replace the compared value
    pub async fn set_value(&self, text: &str) -> E2eResult<()> {
        let input = self.region.find(".criteria-value input").await?;
        input.clear().await?;
        input.send_keys(text).await?;
        let _ = self
            .region
            .wait_for(Condition::text_in_value(&input, text))
            .await?;
        Ok(())
    }

    /// Remove the row
    pub async fn remove(&self) -> E2eResult<()> {
        self.region.find(".remove-rule").await?.click().await?;
        let _ = self.region.wait_for(Condition::stale(self.element())).await?;
        Ok(())
    }
}
