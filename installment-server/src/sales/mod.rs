//! 分期销售业务模块
//!
//! - [`store`] - 销售记录的事务性创建与带账本数据的读取
//! - [`payments`] - 还款的新增/修改/删除，并同步销售状态
//! - [`assignment`] - 将未分配的销售平均分给业务员

pub mod assignment;
pub mod payments;
pub mod store;
