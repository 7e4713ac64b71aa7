pub mod operand_types;
