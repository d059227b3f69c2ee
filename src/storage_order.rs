use crate::types::{Mat3, Real, MAT3_ELEMENTS};

/// The order in which matrix entries are laid out in a flat buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StorageOrder {
    /// Consecutive entries walk down a column first.
    ColumnMajor,
    /// Consecutive entries walk along a row first.
    RowMajor,
}

/// Storage order of Eigen's dense matrices unless `RowMajor` is requested explicitly.
pub const EIGEN_STORAGE_ORDER: StorageOrder = StorageOrder::ColumnMajor;

/// Storage order of nalgebra's dense matrices.
pub const NALGEBRA_STORAGE_ORDER: StorageOrder = StorageOrder::ColumnMajor;

impl StorageOrder {
    /// Builds a 3×3 matrix from nine values laid out in this order.
    pub fn matrix3(self, block: &[Real; MAT3_ELEMENTS]) -> Mat3 {
        match self {
            StorageOrder::ColumnMajor => Mat3::from_column_slice(block),
            StorageOrder::RowMajor => Mat3::from_row_slice(block),
        }
    }

    /// Writes a 3×3 matrix into a flat block in this order.
    pub fn write_matrix3(self, matrix: &Mat3) -> [Real; MAT3_ELEMENTS] {
        let mut block = [0.0; MAT3_ELEMENTS];
        match self {
            StorageOrder::ColumnMajor => block.copy_from_slice(matrix.as_slice()),
            StorageOrder::RowMajor => block.copy_from_slice(matrix.transpose().as_slice()),
        }
        block
    }
}
