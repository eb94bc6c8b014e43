use anyhow::Result;

use crate::ctx::Ctx;

pub fn init(ctx: &Ctx) -> Result<()> {
    ctx.layout.init()?;
    println!(
        "Initialize Success.\nAdd gvs to PATH\n\nexport PATH=\"{}:$PATH\"\n\nAnd, select global Go version\n\ngvs use 1.22",
        ctx.layout.bin_dir().display()
    );
    Ok(())
}
