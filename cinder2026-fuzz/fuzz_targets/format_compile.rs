#![no_main]

use cinder_codec_struct::{FieldOp, StructLayout};
use libfuzzer_sys::fuzz_target;

/// 重算操作码序列隐含的定长宽度，用于与编译产物差分。
fn static_width(ops: &[FieldOp]) -> Option<usize> {
    let mut total = 0usize;
    for op in ops {
        let width = match op {
            FieldOp::Padding(n) | FieldOp::Str(n) => *n,
            FieldOp::ZStr(n) => n.checked_add(1)?,
            FieldOp::PaddingDyn | FieldOp::StrDyn | FieldOp::ZStrDyn => 0,
            FieldOp::Num { kind, .. } => kind.width(),
        };
        total = total.checked_add(width)?;
    }
    Some(total)
}

// === Why === 编译器面对任意字节串只有两种合法出路：返回 `struct.format`
// 错误，或产出一份自洽的操作码程序。任何 panic、环绕或与操作码不一致的
// `fixed_len` 都是缺陷。
fuzz_target!(|data: &str| {
    // 数值重复计数按输入长度展开操作码，截断超长输入以约束内存。
    if data.len() > 64 {
        return;
    }

    if let Ok(layout) = StructLayout::compile(data) {
        assert!(!data.is_empty(), "空格式串必须被拒绝");
        let expected = static_width(layout.ops()).expect("编译成功的程序宽度不得溢出");
        assert_eq!(
            layout.fixed_len(),
            expected,
            "fixed_len 必须与操作码序列一致"
        );
    }
});
