//! Name-based invocation
//!
//! Maps an operation name and positional byte arguments onto [`Secp256k1`].
//! Optional trailing inputs (compression flag, strict mode, entropy, parity)
//! come from [`CallOptions`] so every call has a fixed positional arity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tinysecp_crypto::CurveEngine;
use tracing::debug;

use crate::codec::{serialize_hex, PointBytes, RecoverableSignature, XOnlyPoint};
use crate::error::{Result, ValidationError};
use crate::ops::{PointOptions, Secp256k1, VerifyOptions};

/// Every operation reachable through [`Secp256k1::invoke`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    IsPoint,
    IsPointCompressed,
    IsPrivate,
    PointFromScalar,
    PointCompress,
    PointAdd,
    PointAddScalar,
    PointMultiply,
    PrivateAdd,
    PrivateSub,
    PrivateNegate,
    Sign,
    SignWithEntropy,
    Verify,
    IsXOnlyPoint,
    XOnlyPointFromScalar,
    XOnlyPointFromPoint,
    XOnlyPointAddTweak,
    XOnlyPointAddTweakCheck,
    SignSchnorr,
    VerifySchnorr,
    SignRecoverable,
    Recover,
}

static ALL_OPERATIONS: [Operation; 23] = [
    Operation::IsPoint,
    Operation::IsPointCompressed,
    Operation::IsPrivate,
    Operation::PointFromScalar,
    Operation::PointCompress,
    Operation::PointAdd,
    Operation::PointAddScalar,
    Operation::PointMultiply,
    Operation::PrivateAdd,
    Operation::PrivateSub,
    Operation::PrivateNegate,
    Operation::Sign,
    Operation::SignWithEntropy,
    Operation::Verify,
    Operation::IsXOnlyPoint,
    Operation::XOnlyPointFromScalar,
    Operation::XOnlyPointFromPoint,
    Operation::XOnlyPointAddTweak,
    Operation::XOnlyPointAddTweakCheck,
    Operation::SignSchnorr,
    Operation::VerifySchnorr,
    Operation::SignRecoverable,
    Operation::Recover,
];

impl Operation {
    pub fn all() -> &'static [Operation] {
        &ALL_OPERATIONS
    }

    /// camelCase name
    pub fn name(self) -> &'static str {
        match self {
            Operation::IsPoint => "isPoint",
            Operation::IsPointCompressed => "isPointCompressed",
            Operation::IsPrivate => "isPrivate",
            Operation::PointFromScalar => "pointFromScalar",
            Operation::PointCompress => "pointCompress",
            Operation::PointAdd => "pointAdd",
            Operation::PointAddScalar => "pointAddScalar",
            Operation::PointMultiply => "pointMultiply",
            Operation::PrivateAdd => "privateAdd",
            Operation::PrivateSub => "privateSub",
            Operation::PrivateNegate => "privateNegate",
            Operation::Sign => "sign",
            Operation::SignWithEntropy => "signWithEntropy",
            Operation::Verify => "verify",
            Operation::IsXOnlyPoint => "isXOnlyPoint",
            Operation::XOnlyPointFromScalar => "xOnlyPointFromScalar",
            Operation::XOnlyPointFromPoint => "xOnlyPointFromPoint",
            Operation::XOnlyPointAddTweak => "xOnlyPointAddTweak",
            Operation::XOnlyPointAddTweakCheck => "xOnlyPointAddTweakCheck",
            Operation::SignSchnorr => "signSchnorr",
            Operation::VerifySchnorr => "verifySchnorr",
            Operation::SignRecoverable => "signRecoverable",
            Operation::Recover => "recover",
        }
    }

    /// Number of required positional arguments
    pub fn arity(self) -> usize {
        match self {
            Operation::IsPoint
            | Operation::IsPointCompressed
            | Operation::IsPrivate
            | Operation::PointFromScalar
            | Operation::PointCompress
            | Operation::PrivateNegate
            | Operation::IsXOnlyPoint
            | Operation::XOnlyPointFromScalar
            | Operation::XOnlyPointFromPoint => 1,
            Operation::PointAdd
            | Operation::PointAddScalar
            | Operation::PointMultiply
            | Operation::PrivateAdd
            | Operation::PrivateSub
            | Operation::Sign
            | Operation::SignWithEntropy
            | Operation::XOnlyPointAddTweak
            | Operation::SignSchnorr
            | Operation::SignRecoverable => 2,
            Operation::Verify
            | Operation::XOnlyPointAddTweakCheck
            | Operation::VerifySchnorr
            | Operation::Recover => 3,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown operation: {0}")]
pub struct UnknownOperation(pub String);

fn fold_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    /// Accepts `pointAddScalar`, `point-add-scalar` or `point_add_scalar`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let folded = fold_name(s);
        Operation::all()
            .iter()
            .copied()
            .find(|op| fold_name(op.name()) == folded)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

/// Optional trailing inputs for [`Secp256k1::invoke`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOptions {
    /// Output encoding; `None` infers it
    pub compressed: Option<bool>,
    /// Strict low-S verification
    pub strict: bool,
    /// Extra nonce data for ECDSA, aux randomness for BIP340
    pub entropy: Option<Vec<u8>>,
    /// Expected y parity for `xOnlyPointAddTweakCheck`
    pub parity: Option<u8>,
}

impl CallOptions {
    fn point(&self) -> PointOptions {
        PointOptions { compressed: self.compressed }
    }

    fn verify(&self) -> VerifyOptions {
        VerifyOptions { strict: self.strict }
    }

    fn entropy(&self) -> Option<&[u8]> {
        self.entropy.as_deref()
    }
}

/// Result of an invoked operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Output {
    Bool(bool),
    Point(PointBytes),
    Scalar(#[serde(serialize_with = "serialize_hex")] [u8; 32]),
    Signature(#[serde(serialize_with = "serialize_hex")] [u8; 64]),
    XOnly(XOnlyPoint),
    Recoverable(RecoverableSignature),
    /// No result: point at infinity or a zero scalar
    Null,
}

impl From<Option<PointBytes>> for Output {
    fn from(point: Option<PointBytes>) -> Self {
        point.map_or(Output::Null, Output::Point)
    }
}

impl From<Option<[u8; 32]>> for Output {
    fn from(scalar: Option<[u8; 32]>) -> Self {
        scalar.map_or(Output::Null, Output::Scalar)
    }
}

impl From<Option<XOnlyPoint>> for Output {
    fn from(point: Option<XOnlyPoint>) -> Self {
        point.map_or(Output::Null, Output::XOnly)
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Bool(value) => write!(f, "{}", value),
            Output::Point(point) => write!(f, "{}", point),
            Output::Scalar(scalar) => f.write_str(&hex::encode(scalar)),
            Output::Signature(signature) => f.write_str(&hex::encode(signature)),
            Output::XOnly(point) => write!(f, "{} parity={}", hex::encode(point.x), point.parity),
            Output::Recoverable(recoverable) => write!(
                f,
                "{} recoveryId={}",
                hex::encode(recoverable.signature),
                recoverable.recovery_id
            ),
            Output::Null => f.write_str("null"),
        }
    }
}

impl<E: CurveEngine> Secp256k1<E> {
    /// Run `operation` on positional byte arguments.
    ///
    /// Fewer arguments than the operation's arity is [`ValidationError::InvalidArity`];
    /// extra arguments are ignored. The recovery id for `recover` is a one byte argument.
    pub fn invoke<A: AsRef<[u8]>>(
        &self,
        operation: Operation,
        args: &[A],
        options: &CallOptions,
    ) -> Result<Output> {
        let expected = operation.arity();
        if args.len() < expected {
            return Err(ValidationError::InvalidArity { expected, got: args.len() });
        }
        self.dispatch(operation, args, options).map_err(|err| {
            debug!(op = operation.name(), error = %err, "arguments rejected");
            err
        })
    }

    fn dispatch<A: AsRef<[u8]>>(
        &self,
        operation: Operation,
        args: &[A],
        options: &CallOptions,
    ) -> Result<Output> {
        let arg = |index: usize| args[index].as_ref();

        let output = match operation {
            Operation::IsPoint => Output::Bool(self.is_point(arg(0))),
            Operation::IsPointCompressed => Output::Bool(self.is_point_compressed(arg(0))?),
            Operation::IsPrivate => Output::Bool(self.is_private(arg(0))),
            Operation::PointFromScalar => self.point_from_scalar(arg(0), options.point())?.into(),
            Operation::PointCompress => Output::Point(self.point_compress(arg(0), options.point())?),
            Operation::PointAdd => self.point_add(arg(0), arg(1), options.point())?.into(),
            Operation::PointAddScalar => {
                self.point_add_scalar(arg(0), arg(1), options.point())?.into()
            }
            Operation::PointMultiply => {
                self.point_multiply(arg(0), arg(1), options.point())?.into()
            }
            Operation::PrivateAdd => self.private_add(arg(0), arg(1))?.into(),
            Operation::PrivateSub => self.private_sub(arg(0), arg(1))?.into(),
            Operation::PrivateNegate => Output::Scalar(self.private_negate(arg(0))?),
            Operation::Sign => Output::Signature(self.sign(arg(0), arg(1))?),
            Operation::SignWithEntropy => {
                Output::Signature(self.sign_with_entropy(arg(0), arg(1), options.entropy())?)
            }
            Operation::Verify => {
                Output::Bool(self.verify(arg(0), arg(1), arg(2), options.verify())?)
            }
            Operation::IsXOnlyPoint => Output::Bool(self.is_x_only_point(arg(0))),
            Operation::XOnlyPointFromScalar => Output::XOnly(self.x_only_point_from_scalar(arg(0))?),
            Operation::XOnlyPointFromPoint => Output::XOnly(self.x_only_point_from_point(arg(0))?),
            Operation::XOnlyPointAddTweak => self.x_only_point_add_tweak(arg(0), arg(1))?.into(),
            Operation::XOnlyPointAddTweakCheck => Output::Bool(self.x_only_point_add_tweak_check(
                arg(0),
                arg(1),
                arg(2),
                options.parity,
            )?),
            Operation::SignSchnorr => {
                Output::Signature(self.sign_schnorr(arg(0), arg(1), options.entropy())?)
            }
            Operation::VerifySchnorr => Output::Bool(self.verify_schnorr(arg(0), arg(1), arg(2))?),
            Operation::SignRecoverable => {
                Output::Recoverable(self.sign_recoverable(arg(0), arg(1), options.entropy())?)
            }
            Operation::Recover => {
                let recovery_id = match arg(2) {
                    [id] => *id,
                    _ => return Err(ValidationError::InvalidRecoveryId),
                };
                self.recover(arg(0), arg(1), recovery_id, options.point())?.into()
            }
        };
        Ok(output)
    }
}
