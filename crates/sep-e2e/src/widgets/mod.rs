//! Composite page objects built from the leaf components.

mod advanced_search;
mod comments;
mod datatable;
mod idoc;
mod image;
mod model_import;
mod model_management;
mod search;

pub use advanced_search::{
    AdvancedSearch, AdvancedSearchControls, AdvancedSearchGroup, AdvancedSearchRow,
    AdvancedSearchSection, AdvancedSearchStub, CriteriaGroup, CriteriaNode, CriteriaRule, Junction,
    SearchTree, ADVANCED_SEARCH_URL, ANY_OBJECT_TYPE, DEFAULT_OPERATOR, DEFAULT_PROPERTY,
    MAX_CRITERIA_DEPTH,
};
pub use comments::{Comment, CommentActions, CommentDialog, Comments};
pub use datatable::{
    DatatableCell, DatatableFilter, DatatableHeader, DatatableRow, DatatableWidget,
    InstanceHeader, DATATABLE_FILTER_URL, DATATABLE_WIDGET,
};
pub use idoc::{
    ActionsToolbar, IdocEditor, IdocMode, IdocPage, IdocTab, IdocTabs, UndoRedoToolbar,
    DEFAULT_IDOC_ID, IDOC_PAGE_URL,
};
pub use image::{ImageWidget, IMAGE_WIDGET, IMAGE_WIDGET_URL};
pub use model_import::{ImportOutcome, ModelImportPanel, ModelImportSandbox, MODEL_IMPORT_URL};
pub use model_management::{
    DisplayFilter, HeaderType, ModelAttribute, ModelControls, ModelCreateFieldDialog,
    ModelCreatePropertyDialog, ModelData, ModelDetails, ModelField, ModelFieldsSection,
    ModelGeneralSection, ModelHeader, ModelHeadersSection, ModelManagement,
    ModelManagementSandbox, ModelOptions, ModelRegion, ModelSection, ModelTree,
    MODEL_MANAGEMENT_URL,
};
pub use search::{
    ObjectTypeSelect, SearchForm, SearchResults, ANY_OBJECT, BASIC_SEARCH_URL,
    OBJECT_TYPE_SELECT_URL,
};
