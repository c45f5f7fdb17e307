pub mod dates;
pub mod documents;
pub mod error;
pub mod form;
pub mod labels;
pub mod mapper;
pub mod merge;
pub mod path;
pub mod placeholders;
pub mod record;
pub mod response;
pub mod validate;
pub mod wizard;

pub use documents::{Attachments, DocumentLink, attachments, document_url};
pub use error::{FlowError, FormError, PathError};
pub use form::FormModel;
pub use mapper::{MappingReport, from_backend_record, to_backend_record, to_backend_record_with_report};
pub use merge::merge_payloads;
pub use path::{FieldPath, Segment, get_path, set_path};
pub use record::StudentRecord;
pub use response::ApiResponse;
pub use validate::{FieldError, validate_form, validate_step};
pub use wizard::{EnrollmentWizard, PendingUpload, Phase, Step};
