//! Macros para declarar artifacts y pasos tipados sin boilerplate.
//!
//! Se exportan en la raíz del crate:
//!   use sulfo_core::{typed_artifact, typed_step};
//!
//! `typed_step!` acepta dos formas de cuerpo:
//! - `run(...)`: el cuerpo produce directamente un `Self::Output`.
//! - `try_run(...)`: el cuerpo produce un `StepRunResultTyped<Self::Output>`,
//!   para pasos que pueden fallar o emitir señales.

/// Declara un artifact tipado con derives y `ArtifactSpec`.
///
/// La versión de esquema no es un campo del struct: la inserta
/// `ArtifactSpec::into_artifact` en el payload y la verifica
/// `from_artifact` al decodificar.
#[macro_export]
macro_rules! typed_artifact {
    ($name:ident { $($fname:ident : $fty:ty),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name { $(pub $fname: $fty,)+ }
        impl $crate::model::ArtifactSpec for $name {
            const KIND: $crate::model::ArtifactKind = $crate::model::ArtifactKind::GenericJson;
        }
    };
}

#[macro_export]
macro_rules! typed_step {
    // ---------------- Source con fields, cuerpo infalible ----------------
    (
        source $name:ident {
            id: $id:expr,
            output: $out:ty,
            params: $params:ty,
            fields { $($fname:ident : $fty:ty),+ $(,)? },
            run($self_ident:ident, $p_ident:ident) $body:block
        }
    ) => {
        #[derive(Clone, Debug)]
        pub struct $name { $(pub $fname: $fty),+ }
        impl $name { pub fn new($($fname : $fty),+) -> Self { Self { $($fname),+ } } }
        impl $crate::step::TypedStep for $name {
            type Params = $params;
            type Input = $out;   // ignorado: los Source no reciben input
            type Output = $out;
            fn id(&self) -> &'static str { $id }
            fn kind(&self) -> $crate::step::StepKind { $crate::step::StepKind::Source }
            fn run_typed(&self, _input: Option<Self::Input>, $p_ident: Self::Params) -> $crate::step::StepRunResultTyped<Self::Output> {
                let $self_ident = self;
                let out: Self::Output = { $body };
                $crate::step::StepRunResultTyped::Success { outputs: vec![out] }
            }
        }
    };

    // ---------------- Source con fields, cuerpo falible ----------------
    (
        source $name:ident {
            id: $id:expr,
            output: $out:ty,
            params: $params:ty,
            fields { $($fname:ident : $fty:ty),+ $(,)? },
            try_run($self_ident:ident, $p_ident:ident) $body:block
        }
    ) => {
        #[derive(Clone, Debug)]
        pub struct $name { $(pub $fname: $fty),+ }
        impl $name { pub fn new($($fname : $fty),+) -> Self { Self { $($fname),+ } } }
        impl $crate::step::TypedStep for $name {
            type Params = $params;
            type Input = $out;   // ignorado: los Source no reciben input
            type Output = $out;
            fn id(&self) -> &'static str { $id }
            fn kind(&self) -> $crate::step::StepKind { $crate::step::StepKind::Source }
            fn run_typed(&self, _input: Option<Self::Input>, $p_ident: Self::Params) -> $crate::step::StepRunResultTyped<Self::Output> {
                let $self_ident = self;
                $body
            }
        }
    };

    // ---------------- Source unit ----------------
    (
        source $name:ident {
            id: $id:expr,
            output: $out:ty,
            params: $params:ty,
            run($self_ident:ident, $p_ident:ident) $body:block
        }
    ) => {
        #[derive(Clone, Debug)]
        pub struct $name;
        impl $name { pub fn new() -> Self { Self } }
        impl Default for $name { fn default() -> Self { Self::new() } }
        impl $crate::step::TypedStep for $name {
            type Params = $params;
            type Input = $out;   // ignorado: los Source no reciben input
            type Output = $out;
            fn id(&self) -> &'static str { $id }
            fn kind(&self) -> $crate::step::StepKind { $crate::step::StepKind::Source }
            fn run_typed(&self, _input: Option<Self::Input>, $p_ident: Self::Params) -> $crate::step::StepRunResultTyped<Self::Output> {
                let $self_ident = self;
                let out: Self::Output = { $body };
                $crate::step::StepRunResultTyped::Success { outputs: vec![out] }
            }
        }
    };

    // ---------------- Transform/Sink/Check con fields, infalible ----------------
    (
        step $name:ident {
            id: $id:expr,
            kind: $kind:expr,
            input: $inp:ty,
            output: $out:ty,
            params: $params:ty,
            fields { $($fname:ident : $fty:ty),+ $(,)? },
            run($self_ident:ident, $inp_ident:ident, $p_ident:ident) $body:block
        }
    ) => {
        #[derive(Clone, Debug)]
        pub struct $name { $(pub $fname: $fty),+ }
        impl $name { pub fn new($($fname : $fty),+) -> Self { Self { $($fname),+ } } }
        impl $crate::step::TypedStep for $name {
            type Params = $params;
            type Input = $inp;
            type Output = $out;
            fn id(&self) -> &'static str { $id }
            fn kind(&self) -> $crate::step::StepKind { $kind }
            fn run_typed(&self, input: Option<Self::Input>, $p_ident: Self::Params) -> $crate::step::StepRunResultTyped<Self::Output> {
                let $self_ident = self;
                let $inp_ident: Self::Input = match input {
                    Some(v) => v,
                    None => return $crate::step::StepRunResultTyped::Failure { error: $crate::errors::CoreEngineError::MissingInputs },
                };
                let out: Self::Output = { $body };
                $crate::step::StepRunResultTyped::Success { outputs: vec![out] }
            }
        }
    };

    // ---------------- Transform/Sink/Check con fields, falible ----------------
    (
        step $name:ident {
            id: $id:expr,
            kind: $kind:expr,
            input: $inp:ty,
            output: $out:ty,
            params: $params:ty,
            fields { $($fname:ident : $fty:ty),+ $(,)? },
            try_run($self_ident:ident, $inp_ident:ident, $p_ident:ident) $body:block
        }
    ) => {
        #[derive(Clone, Debug)]
        pub struct $name { $(pub $fname: $fty),+ }
        impl $name { pub fn new($($fname : $fty),+) -> Self { Self { $($fname),+ } } }
        impl $crate::step::TypedStep for $name {
            type Params = $params;
            type Input = $inp;
            type Output = $out;
            fn id(&self) -> &'static str { $id }
            fn kind(&self) -> $crate::step::StepKind { $kind }
            fn run_typed(&self, input: Option<Self::Input>, $p_ident: Self::Params) -> $crate::step::StepRunResultTyped<Self::Output> {
                let $self_ident = self;
                let $inp_ident: Self::Input = match input {
                    Some(v) => v,
                    None => return $crate::step::StepRunResultTyped::Failure { error: $crate::errors::CoreEngineError::MissingInputs },
                };
                $body
            }
        }
    };

    // ---------------- Transform/Sink/Check unit, infalible ----------------
    (
        step $name:ident {
            id: $id:expr,
            kind: $kind:expr,
            input: $inp:ty,
            output: $out:ty,
            params: $params:ty,
            run($self_ident:ident, $inp_ident:ident, $p_ident:ident) $body:block
        }
    ) => {
        #[derive(Clone, Debug)]
        pub struct $name;
        impl $name { pub fn new() -> Self { Self } }
        impl Default for $name { fn default() -> Self { Self::new() } }
        impl $crate::step::TypedStep for $name {
            type Params = $params;
            type Input = $inp;
            type Output = $out;
            fn id(&self) -> &'static str { $id }
            fn kind(&self) -> $crate::step::StepKind { $kind }
            fn run_typed(&self, input: Option<Self::Input>, $p_ident: Self::Params) -> $crate::step::StepRunResultTyped<Self::Output> {
                let $self_ident = self;
                let $inp_ident: Self::Input = match input {
                    Some(v) => v,
                    None => return $crate::step::StepRunResultTyped::Failure { error: $crate::errors::CoreEngineError::MissingInputs },
                };
                let out: Self::Output = { $body };
                $crate::step::StepRunResultTyped::Success { outputs: vec![out] }
            }
        }
    };

    // ---------------- Transform/Sink/Check unit, falible ----------------
    (
        step $name:ident {
            id: $id:expr,
            kind: $kind:expr,
            input: $inp:ty,
            output: $out:ty,
            params: $params:ty,
            try_run($self_ident:ident, $inp_ident:ident, $p_ident:ident) $body:block
        }
    ) => {
        #[derive(Clone, Debug)]
        pub struct $name;
        impl $name { pub fn new() -> Self { Self } }
        impl Default for $name { fn default() -> Self { Self::new() } }
        impl $crate::step::TypedStep for $name {
            type Params = $params;
            type Input = $inp;
            type Output = $out;
            fn id(&self) -> &'static str { $id }
            fn kind(&self) -> $crate::step::StepKind { $kind }
            fn run_typed(&self, input: Option<Self::Input>, $p_ident: Self::Params) -> $crate::step::StepRunResultTyped<Self::Output> {
                let $self_ident = self;
                let $inp_ident: Self::Input = match input {
                    Some(v) => v,
                    None => return $crate::step::StepRunResultTyped::Failure { error: $crate::errors::CoreEngineError::MissingInputs },
                };
                $body
            }
        }
    };
}
