/// Estado de un paso en tiempo de ejecución.
///
/// Transiciones válidas:
/// - `Pending` -> `Running`
/// - `Running` -> `FinishedOk`
/// - `Running` -> `Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Pendiente de ejecución.
    Pending,
    /// En ejecución.
    Running,
    /// Finalizó correctamente.
    FinishedOk,
    /// Falló de forma terminal.
    Failed,
}
