//! Agent errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModalError {
    #[error("A talking-points dialog is already open")]
    AlreadyOpen,

    #[error("No dialog is open")]
    NotOpen,

    #[error("The dialog is submitting and cannot be closed")]
    Busy,
}
