//! Transaction envelope construction and the ledger's binary wire format.
//!
//! A transfer envelope is a legacy message with one System Program `Transfer`
//! instruction, a fee payer, and a recent blockhash:
//! - **compact**: the compact-u16 length prefix used throughout the format
//! - **instruction**: account metas, instructions, and the system transfer encoding
//! - **message**: key ordering, header, and (de)serialization of the signed payload
//! - **transaction**: signatures plus message, signing and verification

pub mod compact;
pub mod error;
pub mod instruction;
pub mod message;
pub mod transaction;

pub use error::TransactionError;
pub use instruction::{
    system_transfer, AccountMeta, CompiledInstruction, Instruction, SystemInstruction,
    SYSTEM_PROGRAM_ID,
};
pub use message::{Message, MessageHeader};
pub use transaction::{SystemTransfer, Transaction, PACKET_DATA_SIZE};
